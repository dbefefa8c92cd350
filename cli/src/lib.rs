pub mod config;

mod blame_cmd;
mod cat_cmd;
mod cors_cmd;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use codeview_backend_client::Client;

pub use blame_cmd::BlameArgs;
pub use cat_cmd::CatArgs;
pub use config::CliConfig;
pub use cors_cmd::EnsureCorsArgs;

/// Browse repository files and blame from the command line.
#[derive(Debug, Parser)]
#[command(name = "codeview", version)]
pub struct Cli {
    /// Instance URL; overrides the config file and CODEVIEW_ENDPOINT
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Access token; overrides the config file and CODEVIEW_ACCESS_TOKEN
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a file and print the lines around the requested position
    Cat(CatArgs),

    /// Show who last changed a range of lines
    Blame(BlameArgs),

    /// Add an origin to the site's CORS allow list
    EnsureCors(EnsureCorsArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let home = config::codeview_home()?;
        let mut config = CliConfig::load(&home)?;
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(token) = self.token {
            config.access_token = Some(token);
        }
        tracing::debug!(endpoint = %config.endpoint, home = %home.display(), "loaded config");

        let client = Client::with_options(config.endpoint.clone(), config.client_options())
            .with_context(|| format!("failed to build client for {}", config.endpoint))?;
        match self.command {
            Command::Cat(args) => cat_cmd::run(args, client, &config).await,
            Command::Blame(args) => blame_cmd::run(args, &client).await,
            Command::EnsureCors(args) => cors_cmd::run(args, &client).await,
        }
    }
}
