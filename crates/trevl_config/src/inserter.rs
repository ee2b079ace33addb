//! Path-addressed insertion into nested documents.
//!
//! Builds nested mappings and sequences on demand while walking a
//! [`DocumentPath`]. Sequences can only be built sequentially: an index may
//! overwrite an existing element or append directly after the last one, but
//! never leave a gap.

use serde_json::{Map, Value};

use crate::errors::{ConfigError, ConfigResult};
use crate::path::{join_segments, DocumentPath, PathSegment};

#[cfg(test)]
#[path = "inserter_tests.rs"]
mod tests;

/// Inserts `value` at `path` inside `container` and returns the container.
///
/// When `path` is empty the value itself is returned. When `container` is
/// `None` a new sequence is created if the first segment is an index,
/// otherwise a new mapping. A `null` found along the way is treated like a
/// missing slot.
///
/// The container is taken by value: callers that accumulate one document
/// across several insertions pass the previous result back in.
///
/// # Errors
///
/// * [`ConfigError::StructuralConflict`] when an index meets a non-sequence or
///   a field name meets a non-mapping.
/// * [`ConfigError::UnsupportedIndex`] when an index is beyond the current
///   sequence length.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_config::insert;
///
/// let doc = insert(json!("$sales.region"), "series.0.x", None)?;
/// let doc = insert(json!("$sales.revenue"), "series.0.y", Some(doc))?;
/// assert_eq!(doc, json!({"series": [{"x": "$sales.region", "y": "$sales.revenue"}]}));
/// # Ok::<(), trevl_config::ConfigError>(())
/// ```
pub fn insert<P>(value: Value, path: P, container: Option<Value>) -> ConfigResult<Value>
where
    P: Into<DocumentPath>,
{
    let path = path.into();
    insert_segments(value, path.segments(), 0, container)
}

/// Inserts `value` at `path` inside `document`, in place.
///
/// On error `document` is left exactly as it was.
pub fn insert_into<P>(document: &mut Value, path: P, value: Value) -> ConfigResult<()>
where
    P: Into<DocumentPath>,
{
    let updated = insert(value, path, Some(document.clone()))?;
    *document = updated;
    Ok(())
}

fn insert_segments(
    value: Value,
    segments: &[PathSegment],
    position: usize,
    container: Option<Value>,
) -> ConfigResult<Value> {
    let Some(head) = segments.get(position) else {
        return Ok(value);
    };
    let container = container.filter(|c| !c.is_null());

    match head {
        PathSegment::Index(index) => {
            let mut items = match container {
                None => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(structural_conflict(
                        &segments[..position],
                        "sequence",
                        &other,
                    ))
                }
            };

            let len = items.len();
            if *index < len {
                let existing = std::mem::take(&mut items[*index]);
                items[*index] = insert_segments(value, segments, position + 1, Some(existing))?;
            } else if *index == len {
                items.push(insert_segments(value, segments, position + 1, None)?);
            } else {
                return Err(ConfigError::UnsupportedIndex {
                    path: join_segments(&segments[..=position]),
                    index: *index,
                    len,
                });
            }
            Ok(Value::Array(items))
        }
        PathSegment::Field(name) => {
            let mut map = match container {
                None => Map::new(),
                Some(Value::Object(map)) => map,
                Some(other) => {
                    return Err(structural_conflict(
                        &segments[..position],
                        "mapping",
                        &other,
                    ))
                }
            };

            match map.get_mut(name) {
                Some(slot) => {
                    let existing = std::mem::take(slot);
                    *slot = insert_segments(value, segments, position + 1, Some(existing))?;
                }
                None => {
                    let built = insert_segments(value, segments, position + 1, None)?;
                    map.insert(name.clone(), built);
                }
            }
            Ok(Value::Object(map))
        }
    }
}

fn structural_conflict(prefix: &[PathSegment], expected: &str, found: &Value) -> ConfigError {
    ConfigError::StructuralConflict {
        path: join_segments(prefix),
        expected: expected.to_string(),
        found: value_kind(found).to_string(),
    }
}

/// Short name for the shape of a document value, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
