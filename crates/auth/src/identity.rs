//! Identity normalization.
//!
//! Some backend responses carry the principal id inside a username-like
//! subject (`"organizer7"`) instead of a numeric field. This is the one place
//! that workaround lives.

use thiserror::Error;

use eventhub_core::UserId;

use crate::Subject;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnresolvableIdentity {
    #[error("credential has no subject")]
    Missing,

    #[error("subject '{0}' contains no digits")]
    NoDigits(String),

    #[error("subject '{0}' does not fit a user id")]
    Overflow(String),

    #[error("subject is neither a number nor a string")]
    UnsupportedType,
}

/// Derive the numeric user id from a raw subject claim.
///
/// Numbers are used as-is. Strings keep only their ASCII digits, which are
/// then parsed as one integer (`"a1b2"` → 12). There is no fallback id.
pub fn normalize_identity(subject: &Subject) -> Result<UserId, UnresolvableIdentity> {
    match subject {
        Subject::Numeric(id) => Ok(UserId::new(*id)),
        Subject::Text(raw) => {
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return Err(UnresolvableIdentity::NoDigits(raw.clone()));
            }
            digits
                .parse::<u64>()
                .map(UserId::new)
                .map_err(|_| UnresolvableIdentity::Overflow(raw.clone()))
        }
        Subject::Other(_) => Err(UnresolvableIdentity::UnsupportedType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn text(s: &str) -> Subject {
        Subject::Text(s.to_string())
    }

    #[test]
    fn numeric_subject_is_used_directly() {
        assert_eq!(normalize_identity(&Subject::Numeric(42)), Ok(UserId::new(42)));
    }

    #[test]
    fn digits_are_extracted_from_usernames() {
        assert_eq!(normalize_identity(&text("admin1")), Ok(UserId::new(1)));
        assert_eq!(normalize_identity(&text("organizer7")), Ok(UserId::new(7)));
        assert_eq!(normalize_identity(&text("42")), Ok(UserId::new(42)));
        assert_eq!(normalize_identity(&text("u-1-0-3")), Ok(UserId::new(103)));
    }

    #[test]
    fn no_digits_is_unresolvable() {
        assert_eq!(
            normalize_identity(&text("nodigits")),
            Err(UnresolvableIdentity::NoDigits("nodigits".into()))
        );
        assert!(normalize_identity(&text("")).is_err());
    }

    #[test]
    fn non_ascii_digits_do_not_count() {
        assert!(matches!(
            normalize_identity(&text("user٣")),
            Err(UnresolvableIdentity::NoDigits(_))
        ));
    }

    #[test]
    fn oversized_digit_runs_are_rejected() {
        let raw = format!("user{}", "9".repeat(30));
        assert_eq!(normalize_identity(&text(&raw)), Err(UnresolvableIdentity::Overflow(raw)));
    }

    #[test]
    fn other_json_is_unsupported() {
        assert_eq!(
            normalize_identity(&Subject::Other(json!(-5))),
            Err(UnresolvableIdentity::UnsupportedType)
        );
    }

    proptest! {
        /// Property: prefixing an id with letters never changes the result.
        #[test]
        fn alphabetic_prefix_is_ignored(id in 0u64..1_000_000_000u64, prefix in "[a-z]{0,12}") {
            let subject = text(&format!("{prefix}{id}"));
            prop_assert_eq!(normalize_identity(&subject), Ok(UserId::new(id)));
        }

        /// Property: strings without digits never resolve.
        #[test]
        fn letters_only_never_resolve(raw in "[a-zA-Z_-]{0,24}") {
            prop_assert!(normalize_identity(&text(&raw)).is_err());
        }
    }
}
