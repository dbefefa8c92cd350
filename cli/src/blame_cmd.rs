use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use codeview_backend_client::BlameRequest;
use codeview_backend_client::Client;
use codeview_backend_client::Hunk;
use owo_colors::OwoColorize;

const SHORT_REV_LEN: usize = 7;

#[derive(Debug, Parser)]
pub struct BlameArgs {
    /// Repository path, e.g. github.com/gorilla/mux
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Commit to blame at
    #[arg(value_name = "COMMIT")]
    pub commit: String,

    /// File path inside the repository
    #[arg(value_name = "PATH")]
    pub path: String,

    /// First line (1-based)
    #[arg(short, long)]
    pub line: u32,

    /// Last line, inclusive; defaults to --line
    #[arg(long)]
    pub end_line: Option<u32>,
}

pub(crate) async fn run(args: BlameArgs, client: &Client) -> Result<()> {
    let request = BlameRequest {
        repo_path: args.repo,
        commit_id: args.commit,
        file_path: args.path,
        start_line: args.line,
        end_line: args.end_line.unwrap_or(args.line),
    };
    let Some(hunks) = client.blame_file(&request).await else {
        bail!(
            "no blame information for {}:{}-{}",
            request.file_path,
            request.start_line,
            request.end_line
        );
    };
    for hunk in &hunks {
        println!("{}", format_hunk(hunk));
    }
    Ok(())
}

fn format_hunk(hunk: &Hunk) -> String {
    let rev: String = hunk.rev.chars().take(SHORT_REV_LEN).collect();
    let summary = hunk.message.lines().next().unwrap_or_default();
    format!(
        "{} {}-{} {} <{}> {} {summary}",
        rev.yellow(),
        hunk.start_line,
        hunk.end_line,
        hunk.author.person.name,
        hunk.author.person.email,
        hunk.author.date,
    )
}
