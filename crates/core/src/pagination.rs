//! Page size limits and search terms shared by every list endpoint.

/// Default number of rows per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Maximum number of rows in a single export.
pub const MAX_EXPORT_ROWS: i64 = 10_000;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Turn a user search string into a literal `ILIKE` operand: `%`, `_` and
/// the backslash escape are matched as themselves. Blank input is no filter.
pub fn like_term(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Some(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_term_escapes_wildcards() {
        assert_eq!(like_term(Some("100%")).as_deref(), Some("100\\%"));
        assert_eq!(like_term(Some("a_b")).as_deref(), Some("a\\_b"));
        assert_eq!(like_term(Some(r"c:\x")).as_deref(), Some(r"c:\\x"));
        assert_eq!(like_term(Some("  Grace ")).as_deref(), Some("Grace"));
        assert_eq!(like_term(Some("   ")), None);
        assert_eq!(like_term(None), None);
    }

    #[test]
    fn limit_defaults_when_absent() {
        assert_eq!(clamp_limit(None, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 20);
    }

    #[test]
    fn limit_is_clamped_to_range() {
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
        assert_eq!(clamp_limit(Some(42), 20, 100), 42);
    }

    #[test]
    fn negative_offset_becomes_zero() {
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
