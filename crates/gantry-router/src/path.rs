/// Request-path utilities
///
/// All functions are pure: given same input, always produce same output
/// with no side effects.
use std::borrow::Cow;

/// Validates that a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use gantry_router::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/user/42"));
///
/// assert!(!is_canonical(""));
/// assert!(!is_canonical("user"));       // missing leading /
/// assert!(!is_canonical("/user/"));     // trailing /
/// assert!(!is_canonical("/user//42"));  // repeated /
/// ```
pub fn is_canonical(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }
    if path.contains("//") {
        return false;
    }
    if path == "/" {
        return true;
    }
    !path.ends_with('/')
}

/// Normalizes a request path to canonical form
///
/// Zero-copy on already-canonical paths via `Cow::Borrowed`; a single
/// allocation otherwise. Strips the trailing slash (except root) and
/// collapses repeated slashes.
///
/// # Examples
///
/// ```
/// use gantry_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/user/42");
/// assert!(matches!(path, Cow::Borrowed("/user/42")));
///
/// assert_eq!(normalize_path("/user/42/"), "/user/42");
/// assert_eq!(normalize_path("/user//42"), "/user/42");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    // Fast path: canonical input is returned borrowed
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_canonical() {
        assert!(is_canonical("/"));
        assert!(is_canonical("/about"));
        assert!(is_canonical("/user/42"));

        assert!(!is_canonical(""));
        assert!(!is_canonical("about"));
        assert!(!is_canonical("/about/"));
        assert!(!is_canonical("/about//page"));
    }

    #[test]
    fn test_normalize_valid_is_zero_copy() {
        let path = normalize_path("/about");
        assert!(matches!(path, Cow::Borrowed("/about")));

        let path = normalize_path("/");
        assert!(matches!(path, Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(normalize_path("/about/"), "/about");
        assert_eq!(normalize_path("/user/42/"), "/user/42");
    }

    #[test]
    fn test_normalize_repeated_slashes() {
        assert_eq!(normalize_path("/about//page"), "/about/page");
        assert_eq!(normalize_path("/a///b////c"), "/a/b/c");
    }

    #[test]
    fn test_normalize_degenerate_inputs() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("user"), "/user");
    }
}
