//! # Keystone Core
//!
//! Core types shared by every Keystone service.
//!
//! - [`IdentityClaim`] - Per-request caller identity trusted from upstream headers
//! - [`UserType`] - Closed set of user type tags with an escape hatch for unknown tags
//! - [`ErrorKind`] - Immutable catalog of business error kinds
//! - [`BusinessError`] - Structured error carrying code, type tag, message and HTTP status
//! - [`classify_error`] / [`wrap_error`] - Helpers for turning foreign errors into business errors
//!
//! ## Error catalog
//!
//! Numeric codes are grouped by domain:
//!
//! | Range         | Domain     |
//! |---------------|------------|
//! | 10001-10099   | User       |
//! | 10100-10199   | Tenant     |
//! | 10200-10299   | Permission |
//! | 10300-10399   | Auth       |
//! | 10400-10499   | Parameter  |
//! | 10500-10599   | Data       |
//! | 19900-19999   | System     |
//!
//! ```
//! use keystone_core::{BusinessError, ErrorKind};
//!
//! let err = BusinessError::from(ErrorKind::TenantMissing);
//! assert_eq!(err.http_code(), 400);
//! assert_eq!(err.error_type(), "TENANT_MISSING");
//! assert!(!err.is_system_error());
//! ```

#![doc(html_root_url = "https://docs.rs/keystone-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classify;
mod error;
mod identity;

pub use classify::{classify_error, wrap_error, WRAPPED_ERROR_TYPE};
pub use error::{
    BusinessError, BusinessResult, ErrorCategory, ErrorDetail, ErrorEntry, ErrorEnvelope,
    ErrorKind, SYSTEM_ERROR_CODE_FLOOR,
};
pub use identity::{IdentityClaim, UserType};
