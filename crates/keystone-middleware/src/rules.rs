//! Path rules for user-type access control.
//!
//! A [`PathRuleTable`] maps each user type to the path prefixes it may
//! **not** access. A user type without an entry is denied everywhere.
//!
//! The table is built once at startup and shared read-only behind an
//! `Arc`. It can be assembled with [`PathRuleTable::builder`] or read from a
//! configuration section:
//!
//! ```yaml
//! access:
//!   match: segment
//!   rules:
//!     platform: ["/api/v1/tenants"]
//!     merchant: ["/api/v1/groups"]
//! ```

use std::collections::HashMap;

use keystone_core::UserType;
use serde::{Deserialize, Serialize};

/// How a denied prefix is compared against the request path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMatch {
    /// Case-sensitive byte prefix. `/api/v1/tenants` also matches
    /// `/api/v1/tenantsFoo`.
    #[default]
    Raw,
    /// Prefix must end on a path segment boundary.
    Segment,
}

impl PrefixMatch {
    /// Returns `true` if `path` falls under `prefix` in this mode.
    ///
    /// ```
    /// use keystone_middleware::PrefixMatch;
    ///
    /// assert!(PrefixMatch::Raw.matches("/api/v1/tenantsFoo", "/api/v1/tenants"));
    /// assert!(!PrefixMatch::Segment.matches("/api/v1/tenantsFoo", "/api/v1/tenants"));
    /// assert!(PrefixMatch::Segment.matches("/api/v1/tenants/1", "/api/v1/tenants"));
    /// ```
    #[must_use]
    pub fn matches(self, path: &str, prefix: &str) -> bool {
        match self {
            Self::Raw => path.starts_with(prefix),
            Self::Segment => path.strip_prefix(prefix).is_some_and(|rest| {
                rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/')
            }),
        }
    }
}

/// Read-only table of denied path prefixes per user type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRuleTable {
    #[serde(default, rename = "match")]
    prefix_match: PrefixMatch,

    #[serde(default)]
    rules: HashMap<UserType, Vec<String>>,
}

impl PathRuleTable {
    /// The standard table: platform operators may not touch tenant
    /// management, merchants may not touch group management.
    #[must_use]
    pub fn standard() -> Self {
        Self::builder()
            .deny(UserType::Platform, ["/api/v1/tenants"])
            .deny(UserType::Merchant, ["/api/v1/groups"])
            .build()
    }

    /// Creates a builder for an empty table.
    #[must_use]
    pub fn builder() -> PathRuleTableBuilder {
        PathRuleTableBuilder::default()
    }

    /// Returns the prefix comparison mode.
    #[must_use]
    pub const fn prefix_match(&self) -> PrefixMatch {
        self.prefix_match
    }

    /// Returns the denied prefixes for a user type, or `None` when the type
    /// has no entry.
    #[must_use]
    pub fn denied_prefixes(&self, user_type: &UserType) -> Option<&[String]> {
        self.rules.get(user_type).map(Vec::as_slice)
    }

    /// Returns `true` if `user_type` may access `path`.
    ///
    /// Unknown user types are never allowed.
    #[must_use]
    pub fn is_allowed(&self, user_type: &UserType, path: &str) -> bool {
        self.denied_prefixes(user_type).is_some_and(|prefixes| {
            !prefixes
                .iter()
                .any(|prefix| self.prefix_match.matches(path, prefix))
        })
    }

    /// Returns the number of user types with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no user type has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`PathRuleTable`].
#[derive(Debug, Default)]
pub struct PathRuleTableBuilder {
    table: PathRuleTable,
}

impl PathRuleTableBuilder {
    /// Adds denied prefixes for a user type. Repeated calls append.
    ///
    /// A type registered with an empty prefix list is allowed everywhere.
    #[must_use]
    pub fn deny<I, S>(mut self, user_type: UserType, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .rules
            .entry(user_type)
            .or_default()
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Sets the prefix comparison mode.
    #[must_use]
    pub const fn prefix_match(mut self, mode: PrefixMatch) -> Self {
        self.table.prefix_match = mode;
        self
    }

    /// Builds the table.
    #[must_use]
    pub fn build(self) -> PathRuleTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = PathRuleTable::standard();
        assert_eq!(table.len(), 2);
        assert_eq!(table.prefix_match(), PrefixMatch::Raw);
        assert_eq!(
            table.denied_prefixes(&UserType::Platform),
            Some(&["/api/v1/tenants".to_string()][..])
        );

        assert!(!table.is_allowed(&UserType::Platform, "/api/v1/tenants/123"));
        assert!(table.is_allowed(&UserType::Platform, "/api/v1/users/123"));
        assert!(!table.is_allowed(&UserType::Merchant, "/api/v1/groups/7"));
        assert!(table.is_allowed(&UserType::Merchant, "/api/v1/tenants/7"));
    }

    #[test]
    fn test_unknown_type_denied() {
        let table = PathRuleTable::standard();
        let unknown = UserType::from("unknown-type");
        assert!(!table.is_allowed(&unknown, "/"));
        assert!(!table.is_allowed(&unknown, "/api/v1/users"));
    }

    #[test]
    fn test_empty_prefix_list_allows_everything() {
        let table = PathRuleTable::builder()
            .deny(UserType::from("auditor"), Vec::<String>::new())
            .build();
        assert!(table.is_allowed(&UserType::from("auditor"), "/api/v1/tenants"));
    }

    #[test]
    fn test_raw_prefix_overmatches() {
        let table = PathRuleTable::standard();
        assert!(!table.is_allowed(&UserType::Platform, "/api/v1/tenantsFoo"));
    }

    #[test]
    fn test_segment_prefix() {
        let table = PathRuleTable::builder()
            .deny(UserType::Platform, ["/api/v1/tenants"])
            .prefix_match(PrefixMatch::Segment)
            .build();

        assert!(table.is_allowed(&UserType::Platform, "/api/v1/tenantsFoo"));
        assert!(!table.is_allowed(&UserType::Platform, "/api/v1/tenants"));
        assert!(!table.is_allowed(&UserType::Platform, "/api/v1/tenants/1"));
    }

    #[test]
    fn test_segment_prefix_with_trailing_slash() {
        assert!(PrefixMatch::Segment.matches("/admin/x", "/admin/"));
        assert!(!PrefixMatch::Segment.matches("/admin", "/admin/"));
    }

    #[test]
    fn test_deny_appends() {
        let table = PathRuleTable::builder()
            .deny(UserType::Merchant, ["/a"])
            .deny(UserType::Merchant, ["/b"])
            .build();
        assert_eq!(table.denied_prefixes(&UserType::Merchant).unwrap().len(), 2);
    }

    #[test]
    fn test_deserialize_from_config() {
        let json = r#"{
            "match": "segment",
            "rules": {
                "platform": ["/api/v1/tenants"],
                "merchant": ["/api/v1/groups"]
            }
        }"#;
        let table: PathRuleTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.prefix_match(), PrefixMatch::Segment);
        assert!(!table.is_allowed(&UserType::Merchant, "/api/v1/groups/7"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let table: PathRuleTable =
            serde_json::from_str(r#"{"rules": {"platform": []}}"#).unwrap();
        assert_eq!(table.prefix_match(), PrefixMatch::Raw);
        assert!(table.is_allowed(&UserType::Platform, "/anything"));
    }
}
