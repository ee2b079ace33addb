//! Built-in component kinds and typed builders for them.
//!
//! The catalogue mirrors the chart types supported by the rendering service.
//! `BaseChart` is the root of all charts; `ScoreComponent` stands on its own.
//!
//! ```text
//! BaseChart
//! ├── LineChart
//! ├── ColumnChart
//! ├── BarChart
//! │   └── StackedBarChart
//! └── PieChart
//!     └── DonutChart
//! ScoreComponent
//! ```

use std::sync::OnceLock;

use serde_json::{json, Map, Value};
use tracing::error;
use trevl_config::{ComponentKind, ConfigurationComposer, KindRegistry, ResolvedKind};

use crate::component::KwargsComponent;
use crate::errors::{TrevlError, TrevlResult};
use crate::query::Query;

#[cfg(test)]
#[path = "charts_tests.rs"]
mod tests;

/// Where a keyword argument takes its value from when the caller omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentDefault {
    /// Reference to the query's first dimension.
    FirstDimension,
    /// Reference to the query's first measure.
    FirstMeasure,
    /// The (possibly defaulted) value of another argument.
    SameAs(&'static str),
    /// A fixed string.
    Literal(&'static str),
    /// No default; the caller must supply the argument.
    Required,
}

/// All built-in kinds.
pub fn builtin_kinds() -> Vec<ComponentKind> {
    vec![
        ComponentKind::new("BaseChart")
            .with_type("chart")
            .with_default(json!({"chart": {"type": "line"}}))
            .with_keyword("title", "title.text")
            .with_keyword("name", "series.0.name")
            .with_keyword("stack", "series.0.stack")
            .with_keyword("color", "series.0.data.color")
            .with_keyword("pointName", "series.0.data.name")
            .with_keyword("x", "series.0.data.x")
            .with_keyword("y", "series.0.data.y")
            .with_keyword("z", "series.0.data.z"),
        ComponentKind::new("LineChart")
            .with_parent("BaseChart")
            .with_default(json!({"chart": {"type": "line"}}))
            .with_keyword("order_by", "series.0.order.0.column")
            .with_keyword("order_direction", "series.0.order.0.order"),
        ComponentKind::new("ColumnChart")
            .with_parent("BaseChart")
            .with_default(json!({"chart": {"type": "column"}}))
            .with_keyword("category", "series.0.data.x")
            .with_keyword("height", "series.0.data.y"),
        ComponentKind::new("BarChart")
            .with_parent("BaseChart")
            .with_default(json!({"chart": {"type": "bar"}}))
            .with_keyword("category", "series.0.data.x")
            .with_keyword("width", "series.0.data.y"),
        ComponentKind::new("StackedBarChart")
            .with_parent("BarChart")
            .with_keyword("stacking", "plotOptions.series.stacking")
            .with_keyword("category", "series.0.name"),
        ComponentKind::new("PieChart")
            .with_parent("BaseChart")
            .with_default(json!({"chart": {"type": "pie"}})),
        ComponentKind::new("DonutChart")
            .with_parent("PieChart")
            .with_keyword("inner", "series.0.innerSize")
            .with_keyword("outer", "series.0.size"),
        ComponentKind::new("ScoreComponent")
            .with_type("score")
            .with_keyword("column", "column"),
    ]
}

/// Constructor defaults for the built-in kinds, in argument order.
///
/// Kinds that are not built in have no defaults.
pub fn argument_defaults(kind: &str) -> &'static [(&'static str, ArgumentDefault)] {
    use ArgumentDefault::*;

    match kind {
        "LineChart" => &[
            ("x", FirstDimension),
            ("y", FirstMeasure),
            ("order_by", SameAs("x")),
            ("order_direction", Literal("asc")),
        ],
        "ColumnChart" => &[("category", FirstDimension), ("height", FirstMeasure)],
        "BarChart" => &[("category", FirstDimension), ("width", FirstMeasure)],
        "StackedBarChart" => &[
            ("stacking", Literal("normal")),
            ("category", FirstDimension),
            ("width", FirstMeasure),
        ],
        "PieChart" => &[("name", Required), ("y", Required)],
        "DonutChart" => &[
            ("y", Required),
            ("name", Required),
            ("inner", Literal("30%")),
            ("outer", Literal("60%")),
        ],
        "ScoreComponent" => &[("column", FirstMeasure)],
        _ => &[],
    }
}

/// Constructor defaults a resolved kind inherits.
///
/// Walks the lineage from the kind itself toward the root and returns the
/// defaults of the first kind that declares any.
pub fn inherited_argument_defaults(
    kind: &ResolvedKind,
) -> &'static [(&'static str, ArgumentDefault)] {
    kind.lineage()
        .iter()
        .rev()
        .map(|name| argument_defaults(name))
        .find(|defaults| !defaults.is_empty())
        .unwrap_or(&[])
}

/// A registry holding the built-in kinds.
pub fn builtin_registry() -> KindRegistry {
    let mut registry = KindRegistry::new();
    for kind in builtin_kinds() {
        let name = kind.name().to_string();
        if let Err(e) = registry.register(kind) {
            error!(kind = %name, error = %e, "Skipping invalid built-in kind");
        }
    }
    registry
}

/// Process-wide composer over the built-in kinds.
pub fn builtin_composer() -> &'static ConfigurationComposer {
    static COMPOSER: OnceLock<ConfigurationComposer> = OnceLock::new();
    COMPOSER.get_or_init(|| ConfigurationComposer::new(builtin_registry()))
}

/// Fills in the constructor defaults `kind` inherits.
///
/// Arguments with a declared default come first, in declaration order,
/// followed by the remaining caller arguments in their original order.
pub fn apply_argument_defaults(
    kind: &ResolvedKind,
    query: &Query,
    args: Map<String, Value>,
) -> TrevlResult<Map<String, Value>> {
    let defaults = inherited_argument_defaults(kind);
    let kind = kind.name();
    if defaults.is_empty() {
        return Ok(args);
    }

    let mut out = Map::new();
    for (argument, default) in defaults {
        let value = match (args.get(*argument), default) {
            (Some(value), _) if !value.is_null() => value.clone(),
            (_, ArgumentDefault::FirstDimension) => {
                json!(first_field(kind, argument, query.dimensions(), "dimension", query)?)
            }
            (_, ArgumentDefault::FirstMeasure) => {
                json!(first_field(kind, argument, query.measures(), "measure", query)?)
            }
            (_, ArgumentDefault::SameAs(other)) => out.get(*other).cloned().unwrap_or(Value::Null),
            (_, ArgumentDefault::Literal(literal)) => json!(literal),
            (_, ArgumentDefault::Required) => {
                return Err(TrevlError::MissingArgument {
                    kind: kind.to_string(),
                    argument: argument.to_string(),
                })
            }
        };
        out.insert(argument.to_string(), value);
    }
    for (name, value) in args {
        if !out.contains_key(&name) {
            out.insert(name, value);
        }
    }
    Ok(out)
}

fn first_field(
    kind: &str,
    argument: &str,
    fields: &[String],
    role: &str,
    query: &Query,
) -> TrevlResult<String> {
    let first = fields.first().ok_or_else(|| TrevlError::NoDefaultField {
        kind: kind.to_string(),
        argument: argument.to_string(),
        role: role.to_string(),
    })?;
    query.field(first)
}

/// Builds a [`KwargsComponent`] of a named kind.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_core::{Component, CubeQuery, LineChart};
///
/// let query = CubeQuery::new("sales", ["revenue"], ["month"])?;
/// let chart = LineChart::builder(query)
///     .id("revenue-by-month")
///     .arg("title", "Revenue")
///     .build()?;
///
/// let document = chart.serialize()?;
/// assert_eq!(document["type"], json!("chart"));
/// assert_eq!(document["display"]["series"][0]["data"]["x"], json!("$sales.month"));
/// # Ok::<(), trevl_core::TrevlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    kind: String,
    query: Query,
    id: Option<String>,
    args: Map<String, Value>,
}

impl ChartBuilder {
    pub fn new(kind: impl Into<String>, query: impl Into<Query>) -> Self {
        Self {
            kind: kind.into(),
            query: query.into(),
            id: None,
            args: Map::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets a keyword argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Sets a keyword argument to the reference of a query field.
    pub fn field_arg(self, name: impl Into<String>, field: &str) -> TrevlResult<Self> {
        let reference = self.query.field(field)?;
        Ok(self.arg(name, reference))
    }

    /// Builds against the built-in kinds.
    pub fn build(self) -> TrevlResult<KwargsComponent> {
        self.build_with(builtin_composer())
    }

    /// Builds against the kinds known to `composer`.
    pub fn build_with(self, composer: &ConfigurationComposer) -> TrevlResult<KwargsComponent> {
        let kind = composer.resolve(&self.kind)?;
        let args = apply_argument_defaults(&kind, &self.query, self.args)?;
        Ok(KwargsComponent::new(kind, self.query, self.id, args))
    }
}

macro_rules! builtin_chart {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $name {
            pub const KIND: &'static str = stringify!($name);

            pub fn builder(query: impl Into<Query>) -> ChartBuilder {
                ChartBuilder::new(Self::KIND, query)
            }
        }
    };
}

builtin_chart!(
    /// Generic chart; a line chart without argument defaults.
    BaseChart
);
builtin_chart!(
    /// Line chart. `x`/`y` default to the first dimension/measure, `order_by`
    /// to `x` and `order_direction` to `asc`.
    LineChart
);
builtin_chart!(
    /// Column chart. `category`/`height` default to the first dimension/measure.
    ColumnChart
);
builtin_chart!(
    /// Horizontal bar chart. `category`/`width` default to the first
    /// dimension/measure.
    BarChart
);
builtin_chart!(
    /// Stacked bar chart; `category` names the series. `stacking` defaults to
    /// `normal`.
    StackedBarChart
);
builtin_chart!(
    /// Pie chart. Requires `name` and `y`.
    PieChart
);
builtin_chart!(
    /// Donut chart. Requires `name` and `y`; `inner`/`outer` default to
    /// `30%`/`60%`.
    DonutChart
);
builtin_chart!(
    /// Single-value score. `column` defaults to the first measure.
    ScoreComponent
);
