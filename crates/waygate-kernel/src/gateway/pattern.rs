//! Compiled route path patterns.
//!
//! Pattern syntax:
//!
//! ```text
//! /api/users               literal segments, case-sensitive exact match
//! /api/users/{user_id}     `{name}` binds exactly one non-empty segment
//! /api/users/**            trailing `**` swallows the remaining suffix
//! ```
//!
//! Patterns are validated once when a route is built.  Matching splits both
//! sides on `/` after trimming leading and trailing slashes and walks them
//! segment by segment, so it is linear in the path length and needs no
//! backtracking.

use super::error::{GatewayError, GatewayResult};
use super::types::PathParams;
use std::collections::HashSet;

const WILDCARD: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
    /// Only ever the last segment.
    Wildcard,
}

/// A validated path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile `pattern`, rejecting malformed syntax.
    pub fn parse(pattern: &str) -> GatewayResult<Self> {
        let invalid = |reason: &str| GatewayError::InvalidPathPattern(pattern.to_string(), reason.to_string());

        if !pattern.starts_with('/') {
            return Err(invalid("path pattern must start with '/'"));
        }

        let parts = split_segments(pattern);
        let mut segments = Vec::with_capacity(parts.len());
        let mut names = HashSet::new();

        for (idx, part) in parts.iter().enumerate() {
            let segment = if *part == WILDCARD {
                if idx + 1 != parts.len() {
                    return Err(invalid("'**' is only allowed as the last segment"));
                }
                Segment::Wildcard
            } else if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(invalid("variable name cannot be empty"));
                }
                if name.contains(['{', '}', '*']) {
                    return Err(invalid("malformed variable segment"));
                }
                if !names.insert(name) {
                    return Err(invalid("duplicate variable name"));
                }
                Segment::Variable(name.to_string())
            } else if part.is_empty() {
                return Err(invalid("empty segment"));
            } else if part.contains(['{', '}']) {
                return Err(invalid("malformed variable segment"));
            } else if part.contains(WILDCARD) {
                return Err(invalid("'**' must occupy a whole segment"));
            } else {
                Segment::Literal((*part).to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the variables this pattern binds, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Whether the pattern ends in `**`.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// Test `path` against the pattern.
    ///
    /// Returns the captured variables on a match (empty when the pattern has
    /// none), `None` otherwise.  The suffix consumed by `**` is not captured.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts = split_segments(path);
        let mut params = PathParams::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Variable(name) => {
                    let value = parts.get(idx).filter(|v| !v.is_empty())?;
                    params.insert(name.clone(), (*value).to_string());
                }
                Segment::Literal(literal) => {
                    if parts.get(idx) != Some(&literal.as_str()) {
                        return None;
                    }
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for PathPattern {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split on `/`, discarding the leading and trailing slash artifacts the same
/// way for patterns and paths.  `""` and `"/"` both yield no segments.
fn split_segments(s: &str) -> Vec<&str> {
    let trimmed = s.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}
