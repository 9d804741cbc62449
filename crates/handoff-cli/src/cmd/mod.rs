use anyhow::Result;
use tracing::debug;

use crate::args::{Cli, Command};

mod describe;
mod id;
mod resolve;

pub fn dispatch(cli: Cli) -> Result<()> {
    debug!(command = ?cli.command, json = cli.json, "dispatching command");
    match cli.command {
        Command::Resolve { config, web_url } => resolve::run(&config, web_url.as_deref()),
        Command::Id { url } => id::run(&url),
        Command::Describe {
            config,
            route,
            head,
            web_url,
        } => describe::run(&config, &route, head.as_deref(), web_url.as_deref()),
    }
}
