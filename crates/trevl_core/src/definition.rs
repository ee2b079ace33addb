//! Declarative dashboard definitions.
//!
//! A definition document describes a dashboard without code:
//!
//! ```yaml
//! description: Sales overview
//! kinds:
//!   - name: AreaChart
//!     parent: LineChart
//!     default: {chart: {type: area}}
//! components:
//!   - kind: LineChart
//!     id: revenue
//!     query: {cube: sales, measures: [revenue], dimensions: [month]}
//!     args: {title: Revenue}
//!     overrides: {series.0.color: "#ff0000"}
//!   - raw: {id: hand-written, type: chart, display: {chart: {type: pie}}, queries: []}
//! ```
//!
//! Extra kinds are registered on top of the built-in catalogue.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use trevl_config::{ComponentKind, ConfigurationComposer};

use crate::charts::{builtin_registry, ChartBuilder};
use crate::component::{Component, RawComponent};
use crate::dashboard::Dashboard;
use crate::errors::{TrevlError, TrevlResult};
use crate::export::ExportFormat;
use crate::query::{Query, QueryDefinition};

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;

/// A single component entry in a [`DashboardDefinition`].
///
/// Either `kind` with `query`, or `raw`, must be given. A `raw` entry may
/// only carry `overrides` besides its document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    #[serde(default)]
    pub args: Map<String, Value>,
    /// Dotted path to value.
    #[serde(default)]
    pub overrides: Map<String, Value>,
}

impl ComponentDefinition {
    fn build(&self, composer: &ConfigurationComposer) -> TrevlResult<Arc<dyn Component>> {
        if let Some(raw) = &self.raw {
            if self.kind.is_some() || self.query.is_some() || !self.args.is_empty() {
                return Err(invalid_definition(
                    "a 'raw' component cannot also set 'kind', 'query' or 'args'".to_string(),
                ));
            }
            let mut component = RawComponent::from_document(raw.clone())?;
            for (path, value) in &self.overrides {
                component.set_override(path, value.clone())?;
            }
            return Ok(Arc::new(component));
        }

        let kind = self.kind.as_deref().ok_or_else(|| {
            invalid_definition("component needs either 'kind' or 'raw'".to_string())
        })?;
        let query_def = self.query.clone().ok_or_else(|| {
            invalid_definition(format!("component of kind '{}' needs a 'query'", kind))
        })?;
        let query = Query::try_from(query_def)?;

        let mut builder = ChartBuilder::new(kind, query);
        if let Some(id) = &self.id {
            builder = builder.id(id.clone());
        }
        for (name, value) in &self.args {
            builder = builder.arg(name.clone(), value.clone());
        }
        let mut component = builder.build_with(composer)?;
        for (path, value) in &self.overrides {
            component.set_override(path, value.clone())?;
        }
        Ok(Arc::new(component))
    }
}

fn invalid_definition(reason: String) -> TrevlError {
    TrevlError::InvalidDefinition { reason }
}

/// A whole dashboard described as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardDefinition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kinds: Vec<ComponentKind>,
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

impl DashboardDefinition {
    /// Parses a definition written in `format`.
    pub fn parse(text: &str, format: ExportFormat) -> TrevlResult<Self> {
        let document = format.parse(text)?;
        serde_json::from_value(document).map_err(|e| TrevlError::ParseError {
            format: "definition".to_string(),
            reason: e.to_string(),
        })
    }

    /// The built-in kinds plus the kinds declared in this definition.
    pub fn composer(&self) -> TrevlResult<ConfigurationComposer> {
        let mut composer = ConfigurationComposer::new(builtin_registry());
        for kind in &self.kinds {
            composer.register(kind.clone())?;
        }
        Ok(composer)
    }

    /// Builds the dashboard against [`DashboardDefinition::composer`].
    pub fn build(&self) -> TrevlResult<Dashboard> {
        let composer = self.composer()?;
        self.build_with(&composer)
    }

    pub fn build_with(&self, composer: &ConfigurationComposer) -> TrevlResult<Dashboard> {
        let mut dashboard = Dashboard::new(self.description.clone());
        for definition in &self.components {
            let component = definition.build(composer)?;
            debug!(
                component_id = component.id(),
                kind = component.kind_name(),
                "Built component from definition"
            );
            dashboard.append(component);
        }
        Ok(dashboard)
    }
}
