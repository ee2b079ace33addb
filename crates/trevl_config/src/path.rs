//! Dotted document paths.
//!
//! A [`DocumentPath`] addresses a position inside a nested document. Each
//! segment is either a field name (a key in a mapping) or a non-negative
//! integer (a position in a sequence). Externally paths are written as
//! dot-separated strings such as `series.0.data.x`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;

/// A single step in a [`DocumentPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A key in a mapping.
    Field(String),
    /// A position in a sequence.
    Index(usize),
}

impl PathSegment {
    /// Classifies a raw segment. Segments made up only of ASCII digits are
    /// sequence indices, everything else is a field name.
    ///
    /// Indices too large for `usize` saturate to `usize::MAX`, which no
    /// sequence can reach.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return PathSegment::Index(raw.parse::<usize>().unwrap_or(usize::MAX));
        }
        PathSegment::Field(raw.to_string())
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// An ordered sequence of [`PathSegment`]s.
///
/// The empty path addresses the root of a document.
///
/// # Examples
///
/// ```rust
/// use trevl_config::{DocumentPath, PathSegment};
///
/// let path = DocumentPath::from("series.0.data.x");
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.segments()[1], PathSegment::Index(0));
/// assert_eq!(path.to_string(), "series.0.data.x");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<PathSegment>,
}

impl DocumentPath {
    /// The empty (root) path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Builds a path from already split segments, classifying each one.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: parts
                .into_iter()
                .map(|p| PathSegment::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits off the first segment.
    pub fn split_first(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_first()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Reads the value stored at this path, if every step exists.
    pub fn get<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| match (segment, current) {
                (PathSegment::Field(name), Value::Object(map)) => map.get(name),
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            })
    }
}

/// Renders a slice of segments as a dotted string.
pub(crate) fn join_segments(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_segments(&self.segments))
    }
}

impl From<&str> for DocumentPath {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            return Self::root();
        }
        Self::from_parts(value.split('.'))
    }
}

impl From<String> for DocumentPath {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&String> for DocumentPath {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<PathSegment>> for DocumentPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl From<&[&str]> for DocumentPath {
    fn from(parts: &[&str]) -> Self {
        Self::from_parts(parts.iter())
    }
}

impl FromStr for DocumentPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Serialize for DocumentPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw))
    }
}
