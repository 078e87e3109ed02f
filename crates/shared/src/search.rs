//! Free-text search helpers.

/// Returns true when `needle` occurs in `haystack`, ignoring case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Matches a search box value against a record's searchable fields.
///
/// A blank query matches every record.
pub fn matches_query<S: AsRef<str>>(fields: &[S], query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| contains_ignore_case(field.as_ref(), needle))
}
