//! Pure validation predicates for client input.
//!
//! These only answer yes/no; callers decide the resulting error response.
//! Patterns are compiled once at first use and reused for the lifetime of
//! the process.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum accepted comment length, in characters.
pub const MAX_COMMENT_CHARS: usize = 255;

// [0-9] rather than \d: the Rust regex \d is Unicode-aware and would
// accept non-ASCII digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

/// True iff the entire string is an optional `+` followed by 10 to 15 digits.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// True iff the entire string is `local@domain.tld` with a TLD of 2+ letters.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// True iff the comment is absent or within [`MAX_COMMENT_CHARS`].
pub fn validate_comment(comment: Option<&str>) -> bool {
    comment.is_none_or(|c| c.chars().count() <= MAX_COMMENT_CHARS)
}
