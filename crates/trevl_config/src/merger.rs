//! Recursive document merging.
//!
//! [`merge`] combines two documents of the same shape where the right-hand
//! side takes precedence:
//!
//! * mappings merge key by key, keys present on one side only are copied;
//! * sequences merge element-wise by position up to the longer length;
//! * scalars of the same type resolve to the right-hand value.
//!
//! Values of different types at the same position are rejected rather than
//! coerced. Neither input is modified.

use serde_json::{Map, Value};

use crate::errors::{ConfigError, ConfigResult};
use crate::inserter::value_kind;
use crate::path::{join_segments, PathSegment};

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// Recursively merges `overlay` on top of `base`.
///
/// # Errors
///
/// Returns [`ConfigError::StructuralConflict`] when the two sides hold
/// differently typed values at the same position.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_config::merge;
///
/// let base = json!({"chart": {"type": "line"}, "series": [{"name": "a"}]});
/// let overlay = json!({"chart": {"type": "pie"}, "series": [{"color": "red"}]});
///
/// let merged = merge(&base, &overlay)?;
/// assert_eq!(
///     merged,
///     json!({"chart": {"type": "pie"}, "series": [{"name": "a", "color": "red"}]})
/// );
/// # Ok::<(), trevl_config::ConfigError>(())
/// ```
pub fn merge(base: &Value, overlay: &Value) -> ConfigResult<Value> {
    let mut path = Vec::new();
    merge_at(base, overlay, &mut path)
}

/// Folds `documents` left to right with [`merge`], starting from an empty
/// mapping. Later documents take precedence.
pub fn merge_all<'a, I>(documents: I) -> ConfigResult<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    documents
        .into_iter()
        .try_fold(Value::Object(Map::new()), |acc, doc| merge(&acc, doc))
}

fn merge_at(base: &Value, overlay: &Value, path: &mut Vec<PathSegment>) -> ConfigResult<Value> {
    match (base, overlay) {
        (Value::Object(left), Value::Object(right)) => {
            let mut out = Map::new();
            for (key, left_value) in left {
                let merged = match right.get(key) {
                    Some(right_value) => {
                        path.push(PathSegment::Field(key.clone()));
                        let merged = merge_at(left_value, right_value, path);
                        path.pop();
                        merged?
                    }
                    None => left_value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            for (key, right_value) in right {
                if !left.contains_key(key) {
                    out.insert(key.clone(), right_value.clone());
                }
            }
            Ok(Value::Object(out))
        }
        (Value::Array(left), Value::Array(right)) => {
            let len = left.len().max(right.len());
            let mut out = Vec::with_capacity(len);
            for index in 0..len {
                let merged = match (left.get(index), right.get(index)) {
                    (Some(l), Some(r)) => {
                        path.push(PathSegment::Index(index));
                        let merged = merge_at(l, r, path);
                        path.pop();
                        merged?
                    }
                    (Some(only), None) | (None, Some(only)) => only.clone(),
                    (None, None) => continue,
                };
                out.push(merged);
            }
            Ok(Value::Array(out))
        }
        (left, right) if value_kind(left) == value_kind(right) => Ok(right.clone()),
        (left, right) => Err(ConfigError::StructuralConflict {
            path: join_segments(path),
            expected: value_kind(left).to_string(),
            found: value_kind(right).to_string(),
        }),
    }
}
