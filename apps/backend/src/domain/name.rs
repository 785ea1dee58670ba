//! Group name and username sanitization rules.
//!
//! Group names are matched and stored in sanitized form: underscores and
//! hyphens become spaces, internal whitespace collapses to a single space,
//! and the result is trimmed. Usernames additionally lowercase, since the
//! upstream hiscores treat names case-insensitively.

use lazy_regex::regex;

/// Sanitize a group name. Idempotent: sanitizing an already-sanitized name
/// yields the same string.
pub fn sanitize_name(name: &str) -> String {
    let spaced = regex!(r"[-_\s]+").replace_all(name, " ");
    spaced.trim().to_string()
}

/// Canonical form of a username used for lookups and storage.
pub fn standardize_username(username: &str) -> String {
    sanitize_name(username).to_lowercase()
}

/// Usernames are 1-12 characters of letters, digits and single spaces.
pub fn is_valid_username(username: &str) -> bool {
    regex!(r"^[a-zA-Z0-9 ]{1,12}$").is_match(&standardize_username(username))
}
