use anyhow::Context;
use anyhow::Result;
use codeview_backend_client::Client;
use codeview_backend_client::ClientOptions;
use codeview_editor::EditorConfig;
use codeview_editor::EditorService;
use codeview_editor::HeadlessEditor;
use codeview_editor::ResourceId;
use codeview_editor::ResourceInput;
use codeview_editor::SelectionRequest;
use editor_test_support::ensure_has_cors_origin;
use editor_test_support::read_env_bool;
use editor_test_support::read_env_string;
use editor_test_support::retry;
use std::sync::Arc;

/// Runs against a real instance when `CODEVIEW_E2E` is truthy.
#[tokio::test]
async fn opens_file_on_live_instance() -> Result<()> {
    if !read_env_bool("CODEVIEW_E2E", Some(false))? {
        return Ok(());
    }
    let endpoint = read_env_string("CODEVIEW_ENDPOINT", Some("http://localhost:3080"))?;
    let origin = read_env_string("CODEVIEW_CORS_ORIGIN", Some("https://github.com"))?;
    let access_token = read_env_string("CODEVIEW_ACCESS_TOKEN", None).ok();

    let client = Client::with_options(
        endpoint,
        ClientOptions {
            access_token,
            ..ClientOptions::default()
        },
    )?;
    ensure_has_cors_origin(&client, &origin).await?;

    let service: EditorService<HeadlessEditor> =
        EditorService::new(Arc::new(client), &EditorConfig::default());
    service.set_editor(HeadlessEditor::new(20));
    let resource = ResourceId::new("github.com/gorilla/mux", "mux.go");

    // Freshly added repositories are cloned in the background.
    let event = retry(|attempt| {
        let input =
            ResourceInput::new(resource.clone()).with_selection(SelectionRequest::position(21, 1));
        let service = &service;
        async move {
            service
                .open(input)
                .await
                .with_context(|| format!("open attempt {attempt}"))
        }
    })
    .await?;

    anyhow::ensure!(
        event.document.text().contains("package mux"),
        "unexpected contents for {resource}"
    );
    Ok(())
}
