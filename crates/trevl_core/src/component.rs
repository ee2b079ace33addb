//! Components and their serialization.
//!
//! A [`KwargsComponent`] is built from a resolved kind, a query and keyword
//! arguments. Its display document is assembled in three layers, each one
//! deep-merged over the previous:
//!
//! 1. the kind's resolved default display;
//! 2. the keyword arguments, each inserted at the path the kind maps it to;
//! 3. the custom overrides set through [`KwargsComponent::set_override`].
//!
//! A [`RawComponent`] wraps a hand-written component document and only
//! applies custom overrides on top of its display.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;
use trevl_config::{insert, insert_into, merge, ConfigError, DocumentPath, ResolvedKind};
use uuid::Uuid;

use crate::errors::{TrevlError, TrevlResult};
use crate::export;
use crate::query::Query;

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;

/// Anything that can be placed on a dashboard.
pub trait Component: fmt::Debug + Send + Sync {
    /// Stable identifier of this component.
    fn id(&self) -> &str;

    /// Name of the component kind, for diagnostics.
    fn kind_name(&self) -> &str;

    /// Produces the component document.
    ///
    /// Serialization has no side effects; calling it repeatedly on an
    /// unchanged component yields equal documents.
    fn serialize(&self) -> TrevlResult<Value>;

    fn to_json(&self) -> TrevlResult<String> {
        export::to_json_string(&self.serialize()?)
    }

    fn to_yaml(&self) -> TrevlResult<String> {
        export::to_yaml_string(&self.serialize()?)
    }
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

/// A component configured through keyword arguments.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_config::{ComponentKind, ConfigurationComposer, KindRegistry};
/// use trevl_core::{Component, CubeQuery, KwargsComponent};
///
/// let composer = ConfigurationComposer::new(KindRegistry::from_kinds([
///     ComponentKind::new("Simple")
///         .with_keyword("x", "series.0.x")
///         .with_keyword("y", "series.0.y"),
/// ])?);
/// let query = CubeQuery::new("sales", ["revenue"], ["region"])?;
///
/// let mut args = serde_json::Map::new();
/// args.insert("x".into(), json!(query.field("region")?));
/// args.insert("y".into(), json!(query.field("revenue")?));
/// let component = KwargsComponent::new(composer.resolve("Simple")?, query, Some("c1".into()), args);
///
/// let document = component.serialize()?;
/// assert_eq!(
///     document["display"],
///     json!({"series": [{"x": "$sales.region", "y": "$sales.revenue"}]})
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct KwargsComponent {
    id: String,
    kind: Arc<ResolvedKind>,
    query: Query,
    kwargs: Map<String, Value>,
    custom: Value,
}

impl KwargsComponent {
    /// Creates a component. Without an `id` one is generated from the kind
    /// name and a random UUID.
    ///
    /// Keyword arguments are not checked here; unknown names are reported by
    /// [`Component::serialize`].
    pub fn new(
        kind: Arc<ResolvedKind>,
        query: impl Into<Query>,
        id: Option<String>,
        kwargs: Map<String, Value>,
    ) -> Self {
        let id = id.unwrap_or_else(|| generate_id(kind.name()));
        Self {
            id,
            kind,
            query: query.into(),
            kwargs,
            custom: empty_document(),
        }
    }

    pub fn kind(&self) -> &ResolvedKind {
        &self.kind
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }

    /// The custom override document.
    pub fn custom(&self) -> &Value {
        &self.custom
    }

    /// Sets a custom display override. Overrides take precedence over both
    /// the kind defaults and the keyword arguments.
    ///
    /// On error the existing overrides are left untouched.
    pub fn set_override<P>(&mut self, path: P, value: impl Into<Value>) -> TrevlResult<()>
    where
        P: Into<DocumentPath>,
    {
        insert_into(&mut self.custom, path, value.into())?;
        Ok(())
    }

    /// Builder-style variant of [`KwargsComponent::set_override`].
    pub fn with_override<P>(mut self, path: P, value: impl Into<Value>) -> TrevlResult<Self>
    where
        P: Into<DocumentPath>,
    {
        self.set_override(path, value)?;
        Ok(self)
    }

    /// Builds the document from the keyword arguments alone.
    fn dynamic_display(&self) -> TrevlResult<Value> {
        let mut dynamic = empty_document();
        for (name, value) in &self.kwargs {
            let path = self
                .kind
                .path_for(name)
                .ok_or_else(|| ConfigError::UnknownKeyword {
                    kind: self.kind.name().to_string(),
                    keyword: name.clone(),
                    valid: self.kind.keyword_names(),
                })?;
            dynamic = insert(value.clone(), path.clone(), Some(dynamic))?;
        }
        Ok(dynamic)
    }
}

impl Component for KwargsComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind_name(&self) -> &str {
        self.kind.name()
    }

    fn serialize(&self) -> TrevlResult<Value> {
        let dynamic = self.dynamic_display()?;
        let display = merge(self.kind.default_display(), &dynamic)?;
        let display = merge(&display, &self.custom)?;

        debug!(
            component_id = %self.id,
            kind = self.kind.name(),
            keywords = self.kwargs.len(),
            "Serialized component"
        );

        let mut out = Map::new();
        out.insert("type".into(), json!(self.kind.component_type()));
        out.insert("id".into(), json!(self.id));
        out.insert("display".into(), display);
        out.insert("queries".into(), json!([self.query.serialize()]));
        Ok(Value::Object(out))
    }
}

/// A component built from a hand-written document.
///
/// The document must be a mapping with a string `id` and a mapping
/// `display`. Serialization merges the custom overrides into `display` and
/// passes every other top-level field through unchanged.
#[derive(Debug, Clone)]
pub struct RawComponent {
    id: String,
    document: Map<String, Value>,
    custom: Value,
}

impl RawComponent {
    pub const KIND: &'static str = "CustomChart";

    pub fn from_document(document: Value) -> TrevlResult<Self> {
        let Value::Object(document) = document else {
            return Err(invalid_raw("document must be a mapping"));
        };
        let id = match document.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(_) => return Err(invalid_raw("'id' must be a string")),
            None => return Err(invalid_raw("missing 'id'")),
        };
        match document.get("display") {
            Some(Value::Object(_)) => {}
            Some(_) => return Err(invalid_raw("'display' must be a mapping")),
            None => return Err(invalid_raw("missing 'display'")),
        }

        Ok(Self {
            id,
            document,
            custom: empty_document(),
        })
    }

    pub fn from_yaml(text: &str) -> TrevlResult<Self> {
        Self::from_document(export::from_yaml_str(text)?)
    }

    pub fn from_json(text: &str) -> TrevlResult<Self> {
        Self::from_document(export::from_json_str(text)?)
    }

    pub fn custom(&self) -> &Value {
        &self.custom
    }

    pub fn set_override<P>(&mut self, path: P, value: impl Into<Value>) -> TrevlResult<()>
    where
        P: Into<DocumentPath>,
    {
        insert_into(&mut self.custom, path, value.into())?;
        Ok(())
    }

    pub fn with_override<P>(mut self, path: P, value: impl Into<Value>) -> TrevlResult<Self>
    where
        P: Into<DocumentPath>,
    {
        self.set_override(path, value)?;
        Ok(self)
    }
}

impl Component for RawComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind_name(&self) -> &str {
        match self.document.get("type") {
            Some(Value::String(component_type)) => component_type,
            _ => Self::KIND,
        }
    }

    fn serialize(&self) -> TrevlResult<Value> {
        let mut out = Map::new();
        for (key, value) in &self.document {
            let value = if key == "display" {
                merge(value, &self.custom)?
            } else {
                value.clone()
            };
            out.insert(key.clone(), value);
        }
        debug!(component_id = %self.id, "Serialized raw component");
        Ok(Value::Object(out))
    }
}

fn invalid_raw(reason: &str) -> TrevlError {
    TrevlError::InvalidRawComponent {
        reason: reason.to_string(),
    }
}

fn generate_id(kind: &str) -> String {
    format!("{}-{}", kind, Uuid::new_v4().simple())
}
