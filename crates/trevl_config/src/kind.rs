//! Component kinds and the kind hierarchy.
//!
//! A [`ComponentKind`] declares its own fragment of the display defaults and
//! its own keyword-to-path mapping, plus an optional parent kind. The
//! [`KindRegistry`] holds all known kinds and walks parent chains.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ConfigError, ConfigResult};
use crate::path::DocumentPath;

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;

fn empty_mapping() -> Value {
    Value::Object(Map::new())
}

/// Declaration of a single component kind.
///
/// Only the kind's *own* declarations are stored here. Resolving them
/// together with the ancestors' declarations is the job of
/// [`crate::ConfigurationComposer`].
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_config::ComponentKind;
///
/// let donut = ComponentKind::new("DonutChart")
///     .with_parent("PieChart")
///     .with_keyword("inner", "series.0.innerSize")
///     .with_keyword("outer", "series.0.size");
///
/// assert_eq!(donut.parent(), Some("PieChart"));
/// assert_eq!(donut.keyword_paths().len(), 2);
/// assert_eq!(donut.default_display(), &json!({}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentKind {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,

    /// Value written to the `type` field of serialized components.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    component_type: Option<String>,

    #[serde(default = "empty_mapping", rename = "default")]
    default_display: Value,

    #[serde(default, rename = "keywords")]
    keyword_paths: BTreeMap<String, DocumentPath>,
}

impl ComponentKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            component_type: None,
            default_display: empty_mapping(),
            keyword_paths: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the serialized `type` for this kind and, unless they declare
    /// their own, for its descendants.
    pub fn with_type(mut self, component_type: impl Into<String>) -> Self {
        self.component_type = Some(component_type.into());
        self
    }

    /// Sets this kind's own default display fragment.
    pub fn with_default(mut self, default_display: Value) -> Self {
        self.default_display = default_display;
        self
    }

    /// Maps a keyword argument to the display path it is written to.
    pub fn with_keyword(mut self, keyword: impl Into<String>, path: impl Into<DocumentPath>) -> Self {
        self.keyword_paths.insert(keyword.into(), path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn component_type(&self) -> Option<&str> {
        self.component_type.as_deref()
    }

    pub fn default_display(&self) -> &Value {
        &self.default_display
    }

    pub fn keyword_paths(&self) -> &BTreeMap<String, DocumentPath> {
        &self.keyword_paths
    }

    fn validate(&self) -> ConfigResult<()> {
        if !self.default_display.is_object() {
            return Err(ConfigError::InvalidDefault {
                kind: self.name.clone(),
                reason: "default display must be a mapping".to_string(),
            });
        }
        if self.parent.as_deref() == Some(self.name.as_str()) {
            return Err(ConfigError::CyclicHierarchy {
                chain: vec![self.name.clone(), self.name.clone()],
            });
        }
        Ok(())
    }
}

/// The set of known component kinds, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, ComponentKind>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of kinds, failing on the first invalid one.
    pub fn from_kinds<I>(kinds: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = ComponentKind>,
    {
        let mut registry = Self::new();
        for kind in kinds {
            registry.register(kind)?;
        }
        Ok(registry)
    }

    /// Adds a kind, replacing and returning any previous kind of the same name.
    ///
    /// Parents do not need to be registered yet; missing parents are only
    /// reported when a chain is walked.
    pub fn register(&mut self, kind: ComponentKind) -> ConfigResult<Option<ComponentKind>> {
        kind.validate()?;
        Ok(self.kinds.insert(kind.name.clone(), kind))
    }

    pub fn get(&self, name: &str) -> Option<&ComponentKind> {
        self.kinds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Names of all registered kinds, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the parent chain of `name`, root-most ancestor first and the
    /// kind itself last.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnknownKind`] when `name` or any parent along the way
    ///   is not registered.
    /// * [`ConfigError::CyclicHierarchy`] when a kind is reached twice.
    pub fn ancestry(&self, name: &str) -> ConfigResult<Vec<&ComponentKind>> {
        let mut chain: Vec<&ComponentKind> = Vec::new();
        let mut next = Some(name);

        while let Some(current) = next {
            if chain.iter().any(|k| k.name == current) {
                let mut names: Vec<String> = chain.iter().map(|k| k.name.clone()).collect();
                names.push(current.to_string());
                return Err(ConfigError::CyclicHierarchy { chain: names });
            }
            let kind = self
                .kinds
                .get(current)
                .ok_or_else(|| ConfigError::UnknownKind {
                    name: current.to_string(),
                })?;
            chain.push(kind);
            next = kind.parent.as_deref();
        }

        chain.reverse();
        Ok(chain)
    }
}
