//! Caller identity types.
//!
//! An [`IdentityClaim`] is built once per request from headers injected by a
//! trusted upstream (the API gateway has already authenticated the caller).
//! It never changes after construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User type tag.
///
/// The two well-known operator classes are explicit variants; any other tag
/// is kept verbatim in [`UserType::Other`] so upstream values are never
/// altered on their way through the pipeline.
///
/// # Example
///
/// ```
/// use keystone_core::UserType;
///
/// assert_eq!(UserType::parse("merchant"), Some(UserType::Merchant));
/// assert_eq!(UserType::parse("auditor"), Some(UserType::Other("auditor".into())));
/// assert_eq!(UserType::parse(""), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    /// Platform operator.
    Platform,
    /// Merchant (tenant) user.
    Merchant,
    /// Any other, unrecognized tag.
    Other(String),
}

impl UserType {
    /// Tag of [`UserType::Platform`].
    pub const PLATFORM: &'static str = "platform";

    /// Tag of [`UserType::Merchant`].
    pub const MERCHANT: &'static str = "merchant";

    /// Parses a tag. Empty tags yield `None`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        if tag.is_empty() {
            None
        } else {
            Some(Self::from(tag))
        }
    }

    /// Returns the tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Platform => Self::PLATFORM,
            Self::Merchant => Self::MERCHANT,
            Self::Other(tag) => tag,
        }
    }

    /// Returns `true` for the built-in variants.
    #[must_use]
    pub const fn is_well_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for UserType {
    fn from(tag: &str) -> Self {
        match tag {
            Self::PLATFORM => Self::Platform,
            Self::MERCHANT => Self::Merchant,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for UserType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            Self::PLATFORM => Self::Platform,
            Self::MERCHANT => Self::Merchant,
            _ => Self::Other(tag),
        }
    }
}

impl From<UserType> for String {
    fn from(user_type: UserType) -> Self {
        match user_type {
            UserType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for UserType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request caller identity.
///
/// Constructed by the identity extraction stage and read by everything after
/// it. Fields are private: a claim cannot be modified once built.
///
/// # Example
///
/// ```
/// use keystone_core::{IdentityClaim, UserType};
///
/// let claim = IdentityClaim::new(7, UserType::parse("platform"), 42);
/// assert_eq!(claim.user_id(), 7);
/// assert_eq!(claim.tenant_id(), 42);
/// assert_eq!(claim.user_type_tag(), "platform");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityClaim {
    user_id: u32,
    user_type: Option<UserType>,
    tenant_id: u32,
}

impl IdentityClaim {
    /// Creates a claim.
    #[must_use]
    pub const fn new(user_id: u32, user_type: Option<UserType>, tenant_id: u32) -> Self {
        Self {
            user_id,
            user_type,
            tenant_id,
        }
    }

    /// Returns the user id.
    #[must_use]
    pub const fn user_id(&self) -> u32 {
        self.user_id
    }

    /// Returns the user type, or `None` when upstream sent none.
    #[must_use]
    pub const fn user_type(&self) -> Option<&UserType> {
        self.user_type.as_ref()
    }

    /// Returns the user type tag, empty when absent.
    #[must_use]
    pub fn user_type_tag(&self) -> &str {
        self.user_type.as_ref().map_or("", UserType::as_str)
    }

    /// Returns the tenant id.
    #[must_use]
    pub const fn tenant_id(&self) -> u32 {
        self.tenant_id
    }
}

impl fmt::Display for IdentityClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user:{}@tenant:{} ({})",
            self.user_id,
            self.tenant_id,
            self.user_type_tag()
        )
    }
}
