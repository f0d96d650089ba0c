//! Pipeline stages.
//!
//! 1. [`identity`] - build the caller's identity claim from gateway headers
//! 2. [`user_type`] - deny paths listed for the caller's user type

pub mod identity;
pub mod user_type;

pub use identity::IdentityMiddleware;
pub use user_type::UserTypeMiddleware;
