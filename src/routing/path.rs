//! Path composition.
//!
//! # Responsibilities
//! - Collapse runs of `/` into a single separator
//! - Concatenate a prefix and a path without producing `//`
//!
//! # Design Decisions
//! - Pure functions, no regex
//! - Leading and trailing separators are kept as written; only runs collapse

/// Path separator.
pub const SEPARATOR: char = '/';

/// Collapse every run of consecutive separators into one.
///
/// ```
/// use hook_router::routing::path::normalize;
///
/// assert_eq!(normalize("/a//b///c"), "/a/b/c");
/// assert_eq!(normalize("//"), "/");
/// assert_eq!(normalize("users/"), "users/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for c in path.chars() {
        if c == SEPARATOR {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        out.push(c);
    }

    out
}

/// Concatenate `prefix` and `path`, then normalize the result.
pub fn join(prefix: &str, path: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + path.len());
    joined.push_str(prefix);
    joined.push_str(path);
    normalize(&joined)
}

/// Concatenate an ordered list of segments (outer-most first) into a single
/// route pattern. The pattern always starts with a separator.
///
/// Segments are appended as written; no separator is inserted between them,
/// so `["api", "users"]` yields `/apiusers`. Each segment is expected to
/// carry its own leading `/`.
pub fn concat<S: AsRef<str>>(segments: &[S]) -> String {
    let mut joined = String::from(SEPARATOR);
    for segment in segments {
        joined.push_str(segment.as_ref());
    }
    normalize(&joined)
}
