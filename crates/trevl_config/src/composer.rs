//! Configuration composition across the kind hierarchy.
//!
//! For a kind and its ancestors (root first, the kind itself last) the
//! composer produces one [`ResolvedKind`]:
//!
//! * the effective keyword mapping is a plain key overwrite of each kind's own
//!   entries, so the most derived declaration of a keyword wins;
//! * the effective default display is a deep merge of each kind's own default
//!   fragment on top of the accumulated result.
//!
//! Composition only depends on the static kind hierarchy, so resolved kinds
//! are cached per name.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{ConfigError, ConfigResult};
use crate::kind::{ComponentKind, KindRegistry};
use crate::merger::merge;
use crate::path::DocumentPath;

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;

/// The effective configuration of a kind after composing its hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedKind {
    name: String,
    component_type: String,
    lineage: Vec<String>,
    keyword_paths: BTreeMap<String, DocumentPath>,
    keyword_sources: BTreeMap<String, String>,
    default_display: Value,
}

impl ResolvedKind {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `type` written into serialized components of this kind.
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Kind names from the root-most ancestor down to this kind.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    pub fn keyword_paths(&self) -> &BTreeMap<String, DocumentPath> {
        &self.keyword_paths
    }

    pub fn path_for(&self, keyword: &str) -> Option<&DocumentPath> {
        self.keyword_paths.get(keyword)
    }

    /// Sorted names of all accepted keyword arguments.
    pub fn keyword_names(&self) -> Vec<String> {
        self.keyword_paths.keys().cloned().collect()
    }

    /// The kind in the lineage whose declaration of `keyword` won.
    pub fn keyword_source(&self, keyword: &str) -> Option<&str> {
        self.keyword_sources.get(keyword).map(String::as_str)
    }

    pub fn default_display(&self) -> &Value {
        &self.default_display
    }
}

/// Composes a root-first chain of kinds into a [`ResolvedKind`].
///
/// # Errors
///
/// * [`ConfigError::CyclicHierarchy`] when a kind appears twice in `chain`.
/// * [`ConfigError::EmptyChain`] when `chain` is empty.
/// * [`ConfigError::StructuralConflict`] when default fragments disagree on
///   the type of a value.
pub fn compose(chain: &[&ComponentKind]) -> ConfigResult<ResolvedKind> {
    let Some(last) = chain.last() else {
        return Err(ConfigError::EmptyChain);
    };

    let mut lineage: Vec<String> = Vec::with_capacity(chain.len());
    let mut keyword_paths = BTreeMap::new();
    let mut keyword_sources = BTreeMap::new();
    let mut default_display = Value::Object(Map::new());
    let mut component_type = None;

    for kind in chain {
        if lineage.iter().any(|name| name == kind.name()) {
            let mut cycle = lineage.clone();
            cycle.push(kind.name().to_string());
            return Err(ConfigError::CyclicHierarchy { chain: cycle });
        }
        lineage.push(kind.name().to_string());

        for (keyword, path) in kind.keyword_paths() {
            keyword_paths.insert(keyword.clone(), path.clone());
            keyword_sources.insert(keyword.clone(), kind.name().to_string());
        }

        default_display = merge(&default_display, kind.default_display())?;

        if let Some(declared) = kind.component_type() {
            component_type = Some(declared.to_string());
        }
    }

    Ok(ResolvedKind {
        name: last.name().to_string(),
        component_type: component_type.unwrap_or_else(|| last.name().to_string()),
        lineage,
        keyword_paths,
        keyword_sources,
        default_display,
    })
}

/// Resolves kinds against a [`KindRegistry`], caching each result.
///
/// The cache is guarded by a lock so a composer can be shared between
/// threads. Registering a kind drops every cached entry since a changed kind
/// affects all of its descendants.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_config::{ComponentKind, ConfigurationComposer, KindRegistry};
///
/// let registry = KindRegistry::from_kinds([
///     ComponentKind::new("Base").with_default(json!({"chart": {"type": "line"}})),
///     ComponentKind::new("Pie")
///         .with_parent("Base")
///         .with_default(json!({"chart": {"type": "pie"}})),
/// ])?;
/// let composer = ConfigurationComposer::new(registry);
///
/// let pie = composer.resolve("Pie")?;
/// assert_eq!(pie.default_display(), &json!({"chart": {"type": "pie"}}));
/// # Ok::<(), trevl_config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigurationComposer {
    registry: KindRegistry,
    cache: RwLock<HashMap<String, Arc<ResolvedKind>>>,
}

impl ConfigurationComposer {
    pub fn new(registry: KindRegistry) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Registers a kind and invalidates all cached compositions.
    pub fn register(&mut self, kind: ComponentKind) -> ConfigResult<Option<ComponentKind>> {
        let previous = self.registry.register(kind)?;
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(previous)
    }

    /// Returns the effective configuration for `name`, composing it on first
    /// use.
    pub fn resolve(&self, name: &str) -> ConfigResult<Arc<ResolvedKind>> {
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Arc::clone(hit));
        }

        let chain = self.registry.ancestry(name)?;
        let resolved = Arc::new(compose(&chain)?);
        debug!(
            kind = name,
            lineage = ?resolved.lineage(),
            keywords = resolved.keyword_paths().len(),
            "Composed component kind"
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let entry = cache
            .entry(name.to_string())
            .or_insert_with(|| Arc::clone(&resolved));
        Ok(Arc::clone(entry))
    }

    /// Number of kinds currently held in the cache.
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
