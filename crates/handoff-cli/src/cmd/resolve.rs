use anyhow::{Context, Result};
use serde::Serialize;

use handoff_core::domain::web_domains;

use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ResolveOut {
    pub origin: String,
    pub candidates: Vec<String>,
    pub overridden: bool,
}

pub fn run(config_path: &str, web_url: Option<&str>) -> Result<()> {
    let cfg = input::load_config(config_path, web_url)?;
    let origin = cfg
        .origin_cell()?
        .get_or_resolve()
        .with_context(|| format!("resolving web origin from {config_path}"))?;

    output::print(&ResolveOut {
        origin: origin.to_string(),
        candidates: web_domains(&cfg.associated_domains),
        overridden: cfg.web_url.is_some(),
    })
}
