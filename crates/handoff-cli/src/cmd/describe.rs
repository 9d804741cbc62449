use anyhow::{Context, Result};
use tracing::debug;

use handoff_core::builder::DescriptorBuilder;

use crate::io::input;
use crate::output;

pub fn run(config_path: &str, route: &str, head: Option<&str>, web_url: Option<&str>) -> Result<()> {
    let cfg = input::load_config(config_path, web_url)?;
    let nodes = match head {
        Some(path) => input::read_head_nodes(path)?,
        None => Vec::new(),
    };
    debug!(route, nodes = nodes.len(), "loaded head nodes");

    let builder = DescriptorBuilder::from_config(&cfg)?;
    let descriptor = builder
        .build(route, &nodes)
        .with_context(|| format!("building activity for {route}"))?;
    descriptor.validate()?;

    output::print(&descriptor)
}
