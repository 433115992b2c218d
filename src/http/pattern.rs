//! Route pattern checks run before mounting.
//!
//! # Responsibilities
//! - Rewrite `:name` captures into the `{name}` form Axum expects
//! - Reject patterns Axum would refuse (stray braces, bare `*` or `:`,
//!   wildcards that are not the last segment)
//! - Detect captures that clash with an already mounted pattern
//!
//! # Design Decisions
//! - Failures are values; the server skips the route with a warning
//! - A capture and a wildcard at the same position count as a clash

use std::collections::HashMap;

use thiserror::Error;

use crate::routing::path::SEPARATOR;

/// Why a pattern cannot be mounted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("segment {segment:?} of {pattern} is not a valid path segment")]
    InvalidSegment { pattern: String, segment: String },

    #[error("wildcard {segment:?} must be the last segment of {pattern}")]
    MisplacedWildcard { pattern: String, segment: String },

    #[error("capture {segment:?} of {pattern} clashes with {existing:?} mounted at the same position")]
    Conflict {
        pattern: String,
        segment: String,
        existing: String,
    },
}

enum Segment<'a> {
    Literal(&'a str),
    Capture(&'a str),
    Wildcard(&'a str),
}

impl Segment<'_> {
    fn render(&self) -> String {
        match self {
            Segment::Literal(text) => text.to_string(),
            Segment::Capture(name) => format!("{{{name}}}"),
            Segment::Wildcard(name) => format!("{{*{name}}}"),
        }
    }
}

fn is_capture_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(segment: &str) -> Option<Segment<'_>> {
    if let Some(name) = segment.strip_prefix(':') {
        return is_capture_name(name).then_some(Segment::Capture(name));
    }
    if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        return match inner.strip_prefix('*') {
            Some(name) => is_capture_name(name).then_some(Segment::Wildcard(name)),
            None => is_capture_name(inner).then_some(Segment::Capture(inner)),
        };
    }
    if segment.starts_with('*') || segment.contains(['{', '}']) {
        return None;
    }
    Some(Segment::Literal(segment))
}

/// Translate `pattern` into Axum's syntax, or explain why it cannot be mounted.
///
/// ```
/// use hook_router::http::pattern::to_router_pattern;
///
/// assert_eq!(to_router_pattern("/users/:id").unwrap(), "/users/{id}");
/// assert!(to_router_pattern("/files/{*rest}/meta").is_err());
/// ```
pub fn to_router_pattern(pattern: &str) -> Result<String, PatternError> {
    let raw: Vec<&str> = pattern.trim_start_matches(SEPARATOR).split(SEPARATOR).collect();
    let mut out = String::with_capacity(pattern.len() + 2);

    for (i, text) in raw.iter().enumerate() {
        let segment = parse(text).ok_or_else(|| PatternError::InvalidSegment {
            pattern: pattern.to_string(),
            segment: text.to_string(),
        })?;
        if matches!(segment, Segment::Wildcard(_)) && i + 1 != raw.len() {
            return Err(PatternError::MisplacedWildcard {
                pattern: pattern.to_string(),
                segment: text.to_string(),
            });
        }
        out.push(SEPARATOR);
        out.push_str(&segment.render());
    }
    Ok(out)
}

/// Captures already mounted, keyed by the shape of the path before them.
#[derive(Debug, Default)]
pub struct CaptureIndex {
    seen: HashMap<String, String>,
}

impl CaptureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the captures of `pattern` (already in Axum syntax), unless
    /// one of them clashes with a capture recorded earlier.
    pub fn register(&mut self, pattern: &str) -> Result<(), PatternError> {
        let mut shape = String::new();
        let mut captures = Vec::new();

        for text in pattern.trim_start_matches(SEPARATOR).split(SEPARATOR) {
            shape.push(SEPARATOR);
            if text.starts_with('{') {
                if let Some(existing) = self.seen.get(&shape) {
                    if existing != text {
                        return Err(PatternError::Conflict {
                            pattern: pattern.to_string(),
                            segment: text.to_string(),
                            existing: existing.clone(),
                        });
                    }
                }
                captures.push((shape.clone(), text.to_string()));
                shape.push_str("{}");
            } else {
                shape.push_str(text);
            }
        }

        self.seen.extend(captures);
        Ok(())
    }
}
