// src/utils/url.rs

//! Helpers for slicing banner link paths.

/// Drop a trailing `?query` from a path or token.
///
/// # Examples
/// ```
/// use wb_banners::utils::url::strip_query;
///
/// assert_eq!(strip_query("/promotions/sale?bid=1"), "/promotions/sale");
/// assert_eq!(strip_query("/brands/abc"), "/brands/abc");
/// ```
pub fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(head, _)| head)
}

/// First non-empty `/`-delimited segment.
pub fn first_segment(path: &str) -> Option<&str> {
    path.split('/').find(|s| !s.is_empty())
}

/// Raw `/`-delimited segment at `index`, counting the empty segment before a
/// leading slash. `/brands/abc` yields `""`, `"brands"`, `"abc"`.
pub fn segment(path: &str, index: usize) -> Option<&str> {
    path.split('/').nth(index)
}

/// Last `/`-delimited segment (the whole string when there is no slash).
pub fn last_segment(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

/// Join a base URL and a path with exactly one slash between them.
///
/// # Examples
/// ```
/// use wb_banners::utils::url::join;
///
/// assert_eq!(join("https://example.com/", "/a/b"), "https://example.com/a/b");
/// assert_eq!(join("https://example.com", "a"), "https://example.com/a");
/// ```
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/promotions/a?x=1&y=2"), "/promotions/a");
        assert_eq!(strip_query("abc"), "abc");
        assert_eq!(strip_query("?only"), "");
    }

    #[test]
    fn test_first_segment() {
        assert_eq!(first_segment("/promotions/sale"), Some("promotions"));
        assert_eq!(first_segment("brands/abc"), Some("brands"));
        assert_eq!(first_segment("//brands"), Some("brands"));
        assert_eq!(first_segment("/"), None);
        assert_eq!(first_segment(""), None);
    }

    #[test]
    fn test_segment() {
        assert_eq!(segment("/brands/123-abc", 2), Some("123-abc"));
        assert_eq!(segment("/brands", 2), None);
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("presets/bucket_7/shardA"), "shardA");
        assert_eq!(last_segment("shardA"), "shardA");
        assert_eq!(last_segment("trailing/"), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(
            join("https://static.example/data/brands/", "abc.json"),
            "https://static.example/data/brands/abc.json"
        );
    }
}
