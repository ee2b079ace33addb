//! Clients for the services around TREVL dashboards.
//!
//! [`XMiddleClient`] sends dashboard documents to the rendering service and
//! returns the rendered component options. [`CubeClient`] executes queries
//! directly against the query-execution service. [`ServiceConfig`] collects
//! the connection settings for both, usually from the environment.

pub mod config;
pub mod cube;
pub mod errors;
pub mod render;
pub mod series;

pub use config::{CubeConfig, ServiceConfig};
pub use cube::CubeClient;
pub use errors::{ClientError, ClientResult};
pub use render::{render_component, RenderOptions, RenderService, XMiddleClient, SCHEMA_VERSION};
pub use series::{extract_chart_rows, extract_series_rows};
