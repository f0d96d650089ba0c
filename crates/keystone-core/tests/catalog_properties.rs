//! Property tests for error classification and user type tags.

use std::io;

use keystone_core::{classify_error, wrap_error, BusinessError, ErrorKind, UserType};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = ErrorKind> {
    proptest::sample::select(ErrorKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn classification_always_lands_in_catalog(message in ".{0,64}") {
        let err = classify_error(&io::Error::new(io::ErrorKind::Other, message));
        prop_assert!(err.kind().is_some());
        prop_assert!(err.http_code() >= 400);
    }

    #[test]
    fn duplicate_wins_over_later_rules(
        prefix in "[a-z ]{0,16}",
        suffix in "[a-z ]{0,16}",
    ) {
        let message = format!("{prefix}Duplicate{suffix} connection timeout");
        let err = classify_error(&io::Error::new(io::ErrorKind::Other, message));
        prop_assert!(err.is(ErrorKind::DataDuplicate));
    }

    #[test]
    fn business_errors_pass_through(kind in kind_strategy(), message in "[a-zA-Z0-9 ]{1,32}") {
        let original = kind.with_message(message);
        prop_assert_eq!(classify_error(&original), original);
    }

    #[test]
    fn wrapping_keeps_identity(kind in kind_strategy(), context in "[a-z]{1,12}") {
        let wrapped = wrap_error(&BusinessError::from(kind), &context);
        prop_assert!(wrapped.is(kind));
        prop_assert_eq!(wrapped.http_code(), kind.http_code());
        let expected_prefix = format!("{context}: ");
        prop_assert!(wrapped.message().starts_with(&expected_prefix));
    }

    #[test]
    fn envelope_carries_catalog_entry(kind in kind_strategy()) {
        let envelope = BusinessError::from(kind).to_envelope();
        prop_assert_eq!(envelope.error.code, kind.code());
        prop_assert_eq!(envelope.error.error_type.as_str(), kind.type_tag());
    }

    #[test]
    fn user_type_tags_pass_through_verbatim(tag in "\\PC{1,24}") {
        let user_type = UserType::parse(&tag).unwrap();
        prop_assert_eq!(user_type.as_str(), tag.as_str());
        prop_assert_eq!(user_type.is_well_known(), tag == "platform" || tag == "merchant");
    }
}

#[test]
fn empty_user_type_is_absent() {
    assert_eq!(UserType::parse(""), None);
}
