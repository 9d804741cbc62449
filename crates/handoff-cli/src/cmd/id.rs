use anyhow::Result;
use serde::Serialize;

use handoff_core::canonical::derive_id;
use handoff_core::model::validate_absolute_url;

use crate::output;

#[derive(Debug, Serialize)]
pub struct IdOut {
    pub url: String,
    pub id: String,
}

pub fn run(url: &str) -> Result<()> {
    validate_absolute_url(url)?;
    output::print(&IdOut {
        url: url.to_string(),
        id: derive_id(url),
    })
}
