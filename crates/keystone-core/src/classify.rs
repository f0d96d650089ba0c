//! Mapping foreign errors onto the business catalog.

use std::error::Error as StdError;

use crate::error::{BusinessError, ErrorKind};

/// Type tag used by [`wrap_error`] for errors outside the catalog.
pub const WRAPPED_ERROR_TYPE: &str = "WRAPPED_ERROR";

/// Message fragments checked in order; the first hit decides the kind.
const CLASSIFICATION_RULES: &[(&[&str], ErrorKind)] = &[
    (&["duplicate", "unique constraint"], ErrorKind::DataDuplicate),
    (&["not found", "no rows"], ErrorKind::DataNotFound),
    (&["foreign key", "constraint"], ErrorKind::DataConstraint),
    (&["permission", "access denied"], ErrorKind::PermissionDenied),
    (&["invalid", "malformed"], ErrorKind::InvalidParameter),
    (&["timeout", "connection"], ErrorKind::ServiceUnavailable),
];

/// Classifies an arbitrary error into a [`BusinessError`].
///
/// A `BusinessError` is returned unchanged. Anything else is matched by its
/// lowercased message against a fixed list of fragments (driver messages such
/// as `duplicate key`, `no rows in result set`, `connection refused`); errors
/// that match nothing become [`ErrorKind::SystemError`].
///
/// # Example
///
/// ```
/// use keystone_core::{classify_error, ErrorKind};
///
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "Connection reset by peer");
/// assert!(classify_error(&io).is(ErrorKind::ServiceUnavailable));
/// ```
pub fn classify_error(err: &(dyn StdError + 'static)) -> BusinessError {
    if let Some(business) = err.downcast_ref::<BusinessError>() {
        return business.clone();
    }
    classify_message(&err.to_string()).into()
}

/// Wraps an error with additional context.
///
/// Business errors keep their code, type and status and get the context
/// prepended to their message. Other errors become a `WRAPPED_ERROR` with the
/// system error code and HTTP 500.
pub fn wrap_error(err: &(dyn StdError + 'static), context: &str) -> BusinessError {
    if let Some(business) = err.downcast_ref::<BusinessError>() {
        let message = format!("{context}: {}", business.message());
        return business.clone().with_message(message);
    }

    BusinessError::new(
        ErrorKind::SystemError.code(),
        format!("{context}: {err}"),
        WRAPPED_ERROR_TYPE,
        500,
    )
}

fn classify_message(message: &str) -> ErrorKind {
    let message = message.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| message.contains(needle)))
        .map_or(ErrorKind::SystemError, |(_, kind)| *kind)
}

impl From<anyhow::Error> for BusinessError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<BusinessError>() {
            Ok(business) => business,
            Err(other) => classify_message(&format!("{other:#}")).into(),
        }
    }
}
