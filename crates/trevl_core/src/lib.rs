//! Declarative dashboard building for TREVL.
//!
//! Components are described through keyword arguments and attached cube
//! queries, then serialized into the abstract dashboard configuration
//! consumed by the rendering service. The display document of each
//! component is composed by [`trevl_config`] from the component kind's
//! hierarchy of defaults, the keyword arguments and any custom overrides.

pub mod charts;
pub mod component;
pub mod dashboard;
pub mod definition;
pub mod errors;
pub mod export;
pub mod query;

pub use charts::{
    apply_argument_defaults, builtin_composer, builtin_kinds, builtin_registry,
    inherited_argument_defaults, ArgumentDefault, BarChart, BaseChart, ChartBuilder, ColumnChart,
    DonutChart, LineChart, PieChart, ScoreComponent, StackedBarChart,
};
pub use component::{Component, KwargsComponent, RawComponent};
pub use dashboard::{Dashboard, IntoComponent};
pub use definition::{ComponentDefinition, DashboardDefinition};
pub use errors::{TrevlError, TrevlResult};
pub use export::ExportFormat;
pub use query::{Computed, CubeQuery, Filter, MultiCubeQuery, Query, QueryDefinition};
