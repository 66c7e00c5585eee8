//! Input normalization for user-typed values

/// Longest search query forwarded upstream, in characters
pub const MAX_SEARCH_QUERY_CHARS: usize = 200;

/// Normalize a search box value.
///
/// Returns `None` for empty or whitespace-only input, which callers
/// answer with an empty result instead of a request.
pub fn normalize_search_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    let truncated: String = trimmed.chars().take(MAX_SEARCH_QUERY_CHARS).collect();
    Some(truncated.trim_end().to_string())
}
