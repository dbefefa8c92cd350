use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use codeview_backend_client::Client;
use codeview_editor::EditorService;
use codeview_editor::EditorWidget;
use codeview_editor::HeadlessEditor;
use codeview_editor::ResourceId;
use codeview_editor::ResourceInput;
use codeview_editor::SelectionRequest;
use owo_colors::OwoColorize;
use std::sync::Arc;

use crate::config::CliConfig;

#[derive(Debug, Parser)]
pub struct CatArgs {
    /// File to open, as git://REPO[?REV]#PATH
    #[arg(value_name = "RESOURCE")]
    pub resource: ResourceId,

    /// Line to place the cursor on and center
    #[arg(short, long)]
    pub line: Option<u32>,

    /// Column for the cursor
    #[arg(short, long, default_value_t = 1, requires = "line")]
    pub column: u32,

    /// Select through this line instead of placing a cursor
    #[arg(long, requires_all = ["line", "end_column"])]
    pub end_line: Option<u32>,

    #[arg(long, requires = "end_line")]
    pub end_column: Option<u32>,

    /// Number of lines to print
    #[arg(long, default_value_t = 40)]
    pub height: u32,
}

impl CatArgs {
    fn selection(&self) -> Option<SelectionRequest> {
        let line = self.line?;
        Some(SelectionRequest {
            start_line: line,
            start_column: self.column,
            end_line: self.end_line,
            end_column: self.end_column,
        })
    }
}

pub(crate) async fn run(args: CatArgs, client: Client, config: &CliConfig) -> Result<()> {
    let service = EditorService::new(Arc::new(client), &config.editor_config());
    service.set_editor(HeadlessEditor::new(args.height));

    let mut input = ResourceInput::new(args.resource.clone());
    if let Some(selection) = args.selection() {
        input = input.with_selection(selection);
    }
    let event = service.open(input).await?;
    tracing::info!(
        resource = %args.resource,
        language = event.document.language().as_str(),
        lines = event.document.line_count(),
        "opened"
    );

    let rendered = event
        .editor
        .with(|editor| render(editor))
        .ok_or_else(|| anyhow!("editor detached while rendering"))?;
    print!("{rendered}");
    Ok(())
}

fn render(editor: &HeadlessEditor) -> String {
    let cursor_line = editor.cursor().line;
    let width = editor
        .document()
        .map(|document| document.line_count().to_string().len())
        .unwrap_or(1);
    let mut out = String::new();
    for (number, text) in editor.visible_lines() {
        let gutter = format!("{number:>width$}");
        if number == cursor_line {
            out.push_str(&format!("{} {text}\n", gutter.bold()));
        } else {
            out.push_str(&format!("{} {text}\n", gutter.dimmed()));
        }
    }
    out
}
