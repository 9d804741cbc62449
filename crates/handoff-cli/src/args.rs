use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "handoff", version, about = "handoff CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve the canonical web origin from an app config.
    Resolve {
        /// App config JSON (app manifest or handoff config).
        #[arg(long)]
        config: String,

        /// Explicit base URL overriding the associated domains.
        #[arg(long)]
        web_url: Option<String>,
    },

    /// Derive the activity id for a webpage URL.
    Id { url: String },

    /// Preview the activity descriptor a screen would register.
    Describe {
        #[arg(long)]
        config: String,

        /// In-app route, e.g. /blog/post-1
        #[arg(long)]
        route: String,

        /// JSON array of head nodes declared by the screen.
        #[arg(long)]
        head: Option<String>,

        #[arg(long)]
        web_url: Option<String>,
    },
}
