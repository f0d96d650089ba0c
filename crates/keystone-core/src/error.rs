//! Business error catalog.
//!
//! Every failure a Keystone service reports to its callers is a
//! [`BusinessError`]. Well-known failures are named by an [`ErrorKind`], an
//! immutable catalog entry holding the numeric code, HTTP status, machine
//! readable type tag and default message. The catalog is a static table; there
//! is no shared mutable error state.
//!
//! Services that need a one-off error can still build one with
//! [`BusinessError::new`].

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`BusinessError`].
pub type BusinessResult<T> = Result<T, BusinessError>;

/// Codes at or above this value belong to the system range.
pub const SYSTEM_ERROR_CODE_FLOOR: i32 = 19900;

/// Domains of the error catalog, one per numeric code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// User account errors (10001-10099).
    User,
    /// Tenant lifecycle errors (10100-10199).
    Tenant,
    /// Role and permission errors (10200-10299).
    Permission,
    /// Authentication and access errors (10300-10399).
    Auth,
    /// Request parameter errors (10400-10499).
    Parameter,
    /// Persistence-level data errors (10500-10599).
    Data,
    /// Infrastructure errors (19900-19999).
    System,
}

impl ErrorCategory {
    /// Returns the category owning the given numeric code, if any.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            10001..=10099 => Some(Self::User),
            10100..=10199 => Some(Self::Tenant),
            10200..=10299 => Some(Self::Permission),
            10300..=10399 => Some(Self::Auth),
            10400..=10499 => Some(Self::Parameter),
            10500..=10599 => Some(Self::Data),
            19900..=19999 => Some(Self::System),
            _ => None,
        }
    }
}

/// A single row of the error catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorEntry {
    /// Numeric business code.
    pub code: i32,
    /// HTTP status reported to callers.
    pub http_code: u16,
    /// Stable machine-readable type tag.
    pub type_tag: &'static str,
    /// Default human-readable message.
    pub message: &'static str,
}

impl ErrorEntry {
    const fn new(code: i32, http_code: u16, type_tag: &'static str, message: &'static str) -> Self {
        Self {
            code,
            http_code,
            type_tag,
            message,
        }
    }
}

/// Named business error kinds.
///
/// Each kind maps to exactly one [`ErrorEntry`] through [`ErrorKind::entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // User
    /// The referenced user does not exist.
    UserNotFound,
    /// A user with the same identity already exists.
    UserAlreadyExists,
    /// The password does not satisfy the format rules.
    InvalidPassword,
    /// The user account is disabled.
    UserDisabled,
    /// The user account was deleted.
    UserDeleted,

    // Tenant
    /// The referenced tenant does not exist.
    TenantNotFound,
    /// A tenant with the same identity already exists.
    TenantAlreadyExists,
    /// The tenant is disabled.
    TenantDisabled,
    /// The tenant is still awaiting review.
    TenantPending,
    /// The tenant application was rejected.
    TenantRejected,

    // Permission
    /// The caller lacks the required permission.
    PermissionDenied,
    /// The referenced role does not exist.
    RoleNotFound,
    /// The role is disabled.
    RoleDisabled,
    /// The referenced permission does not exist.
    PermissionNotFound,

    // Auth
    /// The supplied credentials were rejected.
    InvalidCredentials,
    /// The token has expired.
    TokenExpired,
    /// The token is invalid, or no identity was established upstream.
    TokenInvalid,
    /// The token was revoked.
    TokenRevoked,
    /// The account is locked.
    AccountLocked,
    /// The user identifier header is absent.
    AuthHeaderMissing,
    /// The user identifier header is not a valid identifier.
    AuthHeaderInvalid,
    /// The authentication service failed.
    AuthServiceError,
    /// The identity carries no user type.
    UserTypeUndefined,
    /// The user type may not access the requested resource.
    AccessForbidden,
    /// The tenant identifier header is absent.
    TenantMissing,
    /// The tenant identifier header is not a valid identifier.
    TenantInvalid,
    /// Registration failed.
    RegisterFailed,

    // Parameter
    /// A request parameter is invalid.
    InvalidParameter,
    /// A required request parameter is missing.
    MissingParameter,
    /// A request parameter has the wrong format.
    InvalidFormat,
    /// The email address is malformed.
    InvalidEmail,
    /// The phone number is malformed.
    InvalidPhone,

    // Data
    /// The requested record does not exist.
    DataNotFound,
    /// The write conflicts with existing data.
    DataConflict,
    /// The stored data is invalid.
    DataInvalid,
    /// The write would duplicate an existing record.
    DataDuplicate,
    /// The write violates a data constraint.
    DataConstraint,

    // System
    /// Unclassified internal failure.
    SystemError,
    /// A dependency is unavailable.
    ServiceUnavailable,
    /// The database failed.
    DatabaseError,
    /// The network failed.
    NetworkError,
}

impl ErrorKind {
    /// Every kind in catalog order.
    pub const ALL: [Self; 41] = [
        Self::UserNotFound,
        Self::UserAlreadyExists,
        Self::InvalidPassword,
        Self::UserDisabled,
        Self::UserDeleted,
        Self::TenantNotFound,
        Self::TenantAlreadyExists,
        Self::TenantDisabled,
        Self::TenantPending,
        Self::TenantRejected,
        Self::PermissionDenied,
        Self::RoleNotFound,
        Self::RoleDisabled,
        Self::PermissionNotFound,
        Self::InvalidCredentials,
        Self::TokenExpired,
        Self::TokenInvalid,
        Self::TokenRevoked,
        Self::AccountLocked,
        Self::AuthHeaderMissing,
        Self::AuthHeaderInvalid,
        Self::AuthServiceError,
        Self::UserTypeUndefined,
        Self::AccessForbidden,
        Self::TenantMissing,
        Self::TenantInvalid,
        Self::RegisterFailed,
        Self::InvalidParameter,
        Self::MissingParameter,
        Self::InvalidFormat,
        Self::InvalidEmail,
        Self::InvalidPhone,
        Self::DataNotFound,
        Self::DataConflict,
        Self::DataInvalid,
        Self::DataDuplicate,
        Self::DataConstraint,
        Self::SystemError,
        Self::ServiceUnavailable,
        Self::DatabaseError,
        Self::NetworkError,
    ];

    /// Returns the catalog entry for this kind.
    #[must_use]
    pub const fn entry(self) -> ErrorEntry {
        match self {
            Self::UserNotFound => ErrorEntry::new(10001, 404, "USER_NOT_FOUND", "user not found"),
            Self::UserAlreadyExists => {
                ErrorEntry::new(10002, 409, "USER_ALREADY_EXISTS", "user already exists")
            }
            Self::InvalidPassword => {
                ErrorEntry::new(10003, 400, "INVALID_PASSWORD", "password format is invalid")
            }
            Self::UserDisabled => ErrorEntry::new(10004, 403, "USER_DISABLED", "user is disabled"),
            Self::UserDeleted => ErrorEntry::new(10005, 404, "USER_DELETED", "user has been deleted"),

            Self::TenantNotFound => {
                ErrorEntry::new(10101, 404, "TENANT_NOT_FOUND", "tenant not found")
            }
            Self::TenantAlreadyExists => {
                ErrorEntry::new(10102, 409, "TENANT_ALREADY_EXISTS", "tenant already exists")
            }
            Self::TenantDisabled => {
                ErrorEntry::new(10103, 403, "TENANT_DISABLED", "tenant is disabled")
            }
            Self::TenantPending => {
                ErrorEntry::new(10104, 403, "TENANT_PENDING", "tenant is pending review")
            }
            Self::TenantRejected => {
                ErrorEntry::new(10105, 403, "TENANT_REJECTED", "tenant application was rejected")
            }

            Self::PermissionDenied => {
                ErrorEntry::new(10201, 403, "PERMISSION_DENIED", "permission denied")
            }
            Self::RoleNotFound => ErrorEntry::new(10202, 404, "ROLE_NOT_FOUND", "role not found"),
            Self::RoleDisabled => ErrorEntry::new(10203, 403, "ROLE_DISABLED", "role is disabled"),
            Self::PermissionNotFound => {
                ErrorEntry::new(10204, 404, "PERMISSION_NOT_FOUND", "permission not found")
            }

            Self::InvalidCredentials => {
                ErrorEntry::new(10301, 401, "INVALID_CREDENTIALS", "invalid username or password")
            }
            Self::TokenExpired => ErrorEntry::new(10302, 401, "TOKEN_EXPIRED", "token has expired"),
            Self::TokenInvalid => ErrorEntry::new(10303, 401, "TOKEN_INVALID", "token is invalid"),
            Self::TokenRevoked => {
                ErrorEntry::new(10304, 401, "TOKEN_REVOKED", "token has been revoked")
            }
            Self::AccountLocked => {
                ErrorEntry::new(10305, 403, "ACCOUNT_LOCKED", "account is locked")
            }
            Self::AuthHeaderMissing => ErrorEntry::new(
                10306,
                401,
                "AUTH_HEADER_MISSING",
                "authentication header is missing",
            ),
            Self::AuthHeaderInvalid => ErrorEntry::new(
                10307,
                401,
                "AUTH_HEADER_INVALID",
                "authentication header is invalid",
            ),
            Self::AuthServiceError => ErrorEntry::new(
                10308,
                500,
                "AUTH_SERVICE_ERROR",
                "authentication service error",
            ),
            Self::UserTypeUndefined => {
                ErrorEntry::new(10309, 401, "USER_TYPE_UNDEFINED", "user type is undefined")
            }
            Self::AccessForbidden => {
                ErrorEntry::new(10310, 403, "ACCESS_FORBIDDEN", "access forbidden")
            }
            Self::TenantMissing => {
                ErrorEntry::new(10311, 400, "TENANT_MISSING", "tenant id is missing")
            }
            Self::TenantInvalid => {
                ErrorEntry::new(10312, 400, "TENANT_INVALID", "tenant id is invalid")
            }
            Self::RegisterFailed => {
                ErrorEntry::new(10313, 400, "REGISTER_FAILED", "registration failed")
            }

            Self::InvalidParameter => {
                ErrorEntry::new(10401, 400, "INVALID_PARAMETER", "invalid parameter")
            }
            Self::MissingParameter => {
                ErrorEntry::new(10402, 400, "MISSING_PARAMETER", "required parameter is missing")
            }
            Self::InvalidFormat => ErrorEntry::new(10403, 400, "INVALID_FORMAT", "invalid format"),
            Self::InvalidEmail => {
                ErrorEntry::new(10404, 400, "INVALID_EMAIL", "invalid email address")
            }
            Self::InvalidPhone => {
                ErrorEntry::new(10405, 400, "INVALID_PHONE", "invalid phone number")
            }

            Self::DataNotFound => ErrorEntry::new(10501, 404, "DATA_NOT_FOUND", "data not found"),
            Self::DataConflict => ErrorEntry::new(10502, 409, "DATA_CONFLICT", "data conflict"),
            Self::DataInvalid => ErrorEntry::new(10503, 400, "DATA_INVALID", "data is invalid"),
            Self::DataDuplicate => {
                ErrorEntry::new(10504, 409, "DATA_DUPLICATE", "duplicate data")
            }
            Self::DataConstraint => {
                ErrorEntry::new(10505, 400, "DATA_CONSTRAINT", "data constraint violated")
            }

            Self::SystemError => ErrorEntry::new(19901, 500, "SYSTEM_ERROR", "system error"),
            Self::ServiceUnavailable => {
                ErrorEntry::new(19902, 503, "SERVICE_UNAVAILABLE", "service unavailable")
            }
            Self::DatabaseError => ErrorEntry::new(19903, 500, "DATABASE_ERROR", "database error"),
            Self::NetworkError => ErrorEntry::new(19904, 500, "NETWORK_ERROR", "network error"),
        }
    }

    /// Returns the numeric business code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.entry().code
    }

    /// Returns the HTTP status as a raw number.
    #[must_use]
    pub const fn http_code(self) -> u16 {
        self.entry().http_code
    }

    /// Returns the stable type tag, e.g. `ACCESS_FORBIDDEN`.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        self.entry().type_tag
    }

    /// Returns the default message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        self.entry().message
    }

    /// Returns the catalog domain of this kind.
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match ErrorCategory::from_code(self.code()) {
            Some(category) => category,
            None => ErrorCategory::System,
        }
    }

    /// Looks up a kind by its type tag.
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }

    /// Builds a [`BusinessError`] of this kind with a custom message.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> BusinessError {
        BusinessError::from(self).with_message(message)
    }
}

/// Structured business error.
///
/// Carries a numeric code, a human-readable message, a machine-readable type
/// tag and the HTTP status the transport layer should report.
///
/// # Example
///
/// ```
/// use keystone_core::{BusinessError, ErrorKind};
///
/// let err = ErrorKind::AuthHeaderMissing.with_message("X-User-ID header is missing");
/// assert_eq!(err.to_string(), "X-User-ID header is missing");
/// assert!(err.is(ErrorKind::AuthHeaderMissing));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct BusinessError {
    code: i32,
    message: String,
    #[serde(rename = "type")]
    error_type: String,
    http_code: u16,
}

impl BusinessError {
    /// Creates an arbitrary business error.
    #[must_use]
    pub fn new(
        code: i32,
        message: impl Into<String>,
        error_type: impl Into<String>,
        http_code: u16,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            error_type: error_type.into(),
            http_code,
        }
    }

    /// Replaces the message, keeping code, type and status.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the numeric business code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the machine-readable type tag.
    #[must_use]
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// Returns the HTTP status as a raw number.
    #[must_use]
    pub const fn http_code(&self) -> u16 {
        self.http_code
    }

    /// Returns the HTTP status code.
    ///
    /// Out-of-range values collapse to `500 Internal Server Error`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns `true` when the code lies in the system range.
    #[must_use]
    pub const fn is_system_error(&self) -> bool {
        self.code >= SYSTEM_ERROR_CODE_FLOOR
    }

    /// Returns `true` when the code lies below the system range.
    #[must_use]
    pub const fn is_business_error(&self) -> bool {
        self.code < SYSTEM_ERROR_CODE_FLOOR
    }

    /// Returns the catalog kind matching this error's type tag, if any.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        ErrorKind::from_type_tag(&self.error_type)
    }

    /// Returns `true` if this error was built from `kind`.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.code == kind.code() && self.error_type == kind.type_tag()
    }

    /// Converts this error to a serializable envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.code,
                error_type: self.error_type.clone(),
                message: self.message.clone(),
            },
        }
    }
}

impl From<ErrorKind> for BusinessError {
    fn from(kind: ErrorKind) -> Self {
        let entry = kind.entry();
        Self::new(entry.code, entry.message, entry.type_tag, entry.http_code)
    }
}

/// Serializable error envelope for transport responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Numeric business code.
    pub code: i32,
    /// Machine-readable type tag.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message.
    pub message: String,
}
