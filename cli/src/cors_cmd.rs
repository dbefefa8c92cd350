use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use codeview_backend_client::Client;

#[derive(Debug, Parser)]
pub struct EnsureCorsArgs {
    /// Origin to allow, e.g. https://github.com
    #[arg(value_name = "ORIGIN")]
    pub origin: String,
}

pub(crate) async fn run(args: EnsureCorsArgs, client: &Client) -> Result<()> {
    let added = client
        .ensure_cors_origin(&args.origin)
        .await
        .with_context(|| format!("failed to update CORS origins at {}", client.base_url()))?;
    if added {
        println!("added {} to corsOrigin", args.origin);
    } else {
        println!("{} is already allowed", args.origin);
    }
    Ok(())
}
