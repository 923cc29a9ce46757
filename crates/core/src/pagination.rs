//! Offset/limit clamping shared by list endpoints.

/// Default page size for section listings.
pub const DEFAULT_SECTION_LIMIT: i64 = 100;

/// Default page size for story and post listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Upper bound for any page size.
pub const MAX_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
