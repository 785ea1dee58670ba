//! Test helpers for generating unique test data
//!
//! This module provides utilities to help generate unique test data using ULIDs
//! to ensure test isolation and avoid conflicts between test runs.

use ulid::Ulid;

/// Generate a unique string with the given prefix, in the format
/// `{prefix}-{ulid}`.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique group name with the given prefix.
pub fn unique_group_name(prefix: &str) -> String {
    format!("{} {}", prefix, Ulid::new())
}

/// Generate a unique in-game username with the given prefix.
///
/// Usernames are capped at 12 characters of letters, digits and spaces, so the
/// prefix is truncated to 4 characters and combined with the last 7 characters
/// of a fresh ULID (Crockford base32, so always username-safe).
pub fn unique_username(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    let head: String = prefix.chars().take(4).collect();
    format!("{} {}", head, &ulid[ulid.len() - 7..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_usernames_differ_and_fit() {
        let a = unique_username("alice");
        let b = unique_username("alice");
        assert_ne!(a, b);
        assert!(a.len() <= 12);
        assert!(a.starts_with("alic"));
    }

    #[test]
    fn unique_strs_differ() {
        assert_ne!(unique_str("g"), unique_str("g"));
    }
}
