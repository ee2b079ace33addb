use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use tracing::{info, instrument};
use trevl_core::{export, Dashboard};
use xmiddle_client::{RenderOptions, RenderService, XMiddleClient};

use crate::commands::export_cmd::load_definition;
use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "render_cmd_tests.rs"]
mod tests;

/// Arguments for the render command
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Dashboard definition file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Only print the rendered options of the component with this id
    #[arg(long)]
    pub component: Option<String>,

    /// Dashboard event as a JSON document
    #[arg(long, value_parser = parse_json)]
    pub event: Option<Value>,

    /// Dashboard state as a JSON document
    #[arg(long, value_parser = parse_json)]
    pub state: Option<Value>,
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {}", e))
}

impl RenderArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            event: self.event.clone(),
            state: self.state.clone(),
        }
    }
}

/// Renders `dashboard` through `service`.
///
/// With `component` set, only that component's rendered options are
/// returned; the service answers with components in dashboard order.
pub async fn render_dashboard(
    service: &dyn RenderService,
    dashboard: &Dashboard,
    options: &RenderOptions,
    component: Option<&str>,
) -> Result<Value, Error> {
    let rendered = service.render(dashboard, options).await?;
    let Some(id) = component else {
        return Ok(rendered);
    };

    let index = dashboard
        .components()
        .iter()
        .position(|c| c.id() == id)
        .ok_or_else(|| Error::InvalidArguments(format!("No component with id '{}'", id)))?;
    rendered
        .get("components")
        .and_then(|components| components.get(index))
        .cloned()
        .ok_or_else(|| {
            Error::Service(xmiddle_client::ClientError::InvalidResponse {
                reason: format!("render response has no entry for component '{}'", id),
            })
        })
}

/// Execute the render command
#[instrument(skip(config))]
pub async fn execute(args: &RenderArgs, config: &AppConfig) -> Result<(), Error> {
    let dashboard = load_definition(&args.file)?.build()?;
    let service_config = config.service_config(|name| std::env::var(name).ok())?;
    let client = XMiddleClient::from_config(&service_config)?;

    info!(
        api_root = client.api_root(),
        components = dashboard.len(),
        "Rendering dashboard"
    );
    let rendered = render_dashboard(
        &client,
        &dashboard,
        &args.options(),
        args.component.as_deref(),
    )
    .await?;

    println!("{}", export::to_json_string(&rendered)?);
    Ok(())
}
