//! # Keystone Middleware
//!
//! Request pipeline used in front of Keystone service handlers.
//!
//! The pipeline establishes who is calling and whether their user type may
//! touch the requested path. Both stages trust headers injected by an
//! upstream gateway; neither performs any I/O.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Request → Identity → UserType → Handler → Response
//! ```
//!
//! | Stage | Middleware              | Purpose                                          |
//! |-------|-------------------------|--------------------------------------------------|
//! | 1     | [`IdentityMiddleware`]  | Build an [`IdentityClaim`] from `X-User-ID` etc. |
//! | 2     | [`UserTypeMiddleware`]  | Deny paths listed for the caller's user type     |
//!
//! Every stage returns a [`PipelineResult`]. A failing stage short-circuits
//! with a [`BusinessError`]; turning it into a wire response is left to the
//! caller (see [`ResponseExt::from_business_error`]).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use keystone_middleware::{Pipeline, PathRuleTable, Stage};
//!
//! let pipeline = Pipeline::identity_and_access(Arc::new(PathRuleTable::standard()));
//! assert_eq!(pipeline.stage_names(), vec![Stage::Identity.name(), Stage::UserType.name()]);
//! ```
//!
//! [`IdentityClaim`]: keystone_core::IdentityClaim
//! [`BusinessError`]: keystone_core::BusinessError

#![doc(html_root_url = "https://docs.rs/keystone-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod rules;
pub mod stages;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
pub use rules::{PathRuleTable, PathRuleTableBuilder, PrefixMatch};
pub use stages::{IdentityMiddleware, UserTypeMiddleware};
pub use transport::{ServerTransport, TransportKind};
pub use types::{PipelineResult, Request, Response, ResponseExt};
