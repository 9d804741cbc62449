use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use handoff_core::config::HandoffConfig;
use handoff_core::metadata::HeadNode;

pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let v: Value = serde_json::from_str(&raw).map_err(|e| anyhow!("invalid json: {e}"))?;
    Ok(v)
}

/// Load a config file: an app manifest (`expo` / `ios` keys) or a handoff config.
pub fn load_config(path: &str, web_url: Option<&str>) -> Result<HandoffConfig> {
    let v = read_json_file(path)?;

    let mut cfg = if looks_like_manifest(&v) {
        HandoffConfig::from_app_manifest(&v)?
    } else {
        serde_json::from_value(v).map_err(|e| anyhow!("invalid handoff config: {e}"))?
    };

    if let Some(url) = web_url {
        cfg.web_url = Some(url.to_string());
    }
    Ok(cfg)
}

pub fn read_head_nodes(path: &str) -> Result<Vec<HeadNode>> {
    let v = read_json_file(path)?;
    serde_json::from_value(v).map_err(|e| anyhow!("invalid head nodes: {e}"))
}

fn looks_like_manifest(v: &Value) -> bool {
    v.get("expo").is_some() || v.get("ios").is_some()
}
