//! Dashboards: ordered collections of components.

use std::ops::{Add, AddAssign};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::component::{Component, KwargsComponent, RawComponent};
use crate::errors::TrevlResult;
use crate::export;

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;

/// An ordered list of components with an optional description.
///
/// Combining dashboards never reorders existing components. When two
/// dashboards are combined the receiver's description is kept if it is
/// non-empty, otherwise the other dashboard's description is used.
///
/// # Examples
///
/// ```rust
/// use trevl_core::{CubeQuery, Dashboard, ScoreComponent};
///
/// let query = CubeQuery::new("sales", ["revenue"], ["region"])?;
/// let score = ScoreComponent::builder(query).id("total").build()?;
///
/// let mut dashboard = Dashboard::new("Sales overview");
/// dashboard.append(score);
///
/// let document = dashboard.serialize()?;
/// assert_eq!(document["description"], "Sales overview");
/// assert_eq!(document["components"][0]["id"], "total");
/// # Ok::<(), trevl_core::TrevlError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    description: String,
    components: Vec<Arc<dyn Component>>,
}

impl Dashboard {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            components: Vec::new(),
        }
    }

    pub fn from_components(components: Vec<Arc<dyn Component>>) -> Self {
        Self {
            description: String::new(),
            components,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn components(&self) -> &[Arc<dyn Component>] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn combined_description(&self, other: &Dashboard) -> String {
        if self.description.is_empty() {
            other.description.clone()
        } else {
            self.description.clone()
        }
    }

    /// New dashboard with `other`'s components after this one's.
    pub fn concat(&self, other: &Dashboard) -> Dashboard {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Dashboard {
            description: self.combined_description(other),
            components,
        }
    }

    /// New dashboard with `component` after this one's components.
    pub fn with_component(&self, component: impl IntoComponent) -> Dashboard {
        let mut components = self.components.clone();
        components.push(component.into_component());
        Dashboard {
            description: self.description.clone(),
            components,
        }
    }

    /// New dashboard with `other`'s components before this one's.
    pub fn prepend(&self, other: &Dashboard) -> Dashboard {
        let mut components = other.components.clone();
        components.extend(self.components.iter().cloned());
        Dashboard {
            description: self.combined_description(other),
            components,
        }
    }

    /// New dashboard with `component` before this one's components.
    pub fn prepend_component(&self, component: impl IntoComponent) -> Dashboard {
        let mut components = vec![component.into_component()];
        components.extend(self.components.iter().cloned());
        Dashboard {
            description: self.description.clone(),
            components,
        }
    }

    /// Appends a component in place.
    pub fn append(&mut self, component: impl IntoComponent) {
        self.components.push(component.into_component());
    }

    /// Appends all of `other`'s components in place.
    pub fn extend(&mut self, other: &Dashboard) {
        if self.description.is_empty() {
            self.description = other.description.clone();
        }
        self.components.extend(other.components.iter().cloned());
    }

    /// Produces the dashboard document.
    ///
    /// Fails on the first component that fails to serialize; no partial
    /// document is returned.
    pub fn serialize(&self) -> TrevlResult<Value> {
        let components = self
            .components
            .iter()
            .map(|c| c.serialize())
            .collect::<TrevlResult<Vec<Value>>>()?;

        debug!(
            components = components.len(),
            "Serialized dashboard"
        );

        let mut out = Map::new();
        if !self.description.is_empty() {
            out.insert("description".into(), json!(self.description));
        }
        out.insert("components".into(), Value::Array(components));
        Ok(Value::Object(out))
    }

    pub fn to_json(&self) -> TrevlResult<String> {
        export::to_json_string(&self.serialize()?)
    }

    pub fn to_yaml(&self) -> TrevlResult<String> {
        export::to_yaml_string(&self.serialize()?)
    }
}

/// Conversion into a shared component handle.
pub trait IntoComponent {
    fn into_component(self) -> Arc<dyn Component>;
}

impl<C: Component + 'static> IntoComponent for C {
    fn into_component(self) -> Arc<dyn Component> {
        Arc::new(self)
    }
}

impl IntoComponent for Arc<dyn Component> {
    fn into_component(self) -> Arc<dyn Component> {
        self
    }
}

impl Add for Dashboard {
    type Output = Dashboard;

    fn add(self, rhs: Dashboard) -> Dashboard {
        self.concat(&rhs)
    }
}

impl AddAssign for Dashboard {
    fn add_assign(&mut self, rhs: Dashboard) {
        self.extend(&rhs);
    }
}

macro_rules! component_arithmetic {
    ($($component:ty),* $(,)?) => {
        $(
            impl Add<$component> for Dashboard {
                type Output = Dashboard;

                fn add(mut self, rhs: $component) -> Dashboard {
                    self.append(rhs);
                    self
                }
            }

            impl AddAssign<$component> for Dashboard {
                fn add_assign(&mut self, rhs: $component) {
                    self.append(rhs);
                }
            }

            impl Add<Dashboard> for $component {
                type Output = Dashboard;

                fn add(self, rhs: Dashboard) -> Dashboard {
                    rhs.prepend_component(self)
                }
            }
        )*
    };
}

component_arithmetic!(Arc<dyn Component>, KwargsComponent, RawComponent);

macro_rules! component_pairs {
    ($($lhs:ty => [$($rhs:ty),*]);* $(;)?) => {
        $($(
            impl Add<$rhs> for $lhs {
                type Output = Dashboard;

                fn add(self, rhs: $rhs) -> Dashboard {
                    Dashboard::default().with_component(self).with_component(rhs)
                }
            }
        )*)*
    };
}

component_pairs! {
    KwargsComponent => [KwargsComponent, RawComponent];
    RawComponent => [KwargsComponent, RawComponent];
}
