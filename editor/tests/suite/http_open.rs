use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use codeview_editor::EditorError;
use codeview_editor::FetchError;
use codeview_editor::ResourceId;
use codeview_editor::ResourceInput;
use codeview_editor::SelectionRequest;
use editor_test_support::headless_service;
use editor_test_support::mount_tree_entry;
use editor_test_support::mount_tree_response;
use editor_test_support::test_client;
use editor_test_support::tree_path;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn router() -> ResourceId {
    ResourceId::new("github.com/acme/web", "src/router.ts").with_rev("main")
}

fn numbered(lines: u32) -> String {
    (1..=lines)
        .map(|n| format!("export const line{n} = {n};"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn open_fetches_classifies_and_reveals() {
    let server = MockServer::start().await;
    mount_tree_entry(&server, &router(), &numbered(60)).await;
    let service = headless_service(test_client(&server), 5);

    let event = service
        .open(ResourceInput::new(router()).with_selection(SelectionRequest::position(30, 1)))
        .await
        .unwrap();

    assert_eq!(event.document.language().as_str(), "typescript");
    assert_eq!(event.document.line_count(), 60);
    let visible = event
        .editor
        .with(|editor| {
            editor
                .visible_lines()
                .into_iter()
                .map(|(n, _)| n)
                .collect::<Vec<_>>()
        })
        .unwrap();
    assert_eq!(visible, vec![28, 29, 30, 31, 32]);
}

#[tokio::test]
async fn concurrent_resolves_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(tree_path("github.com/acme/web@main", "src/router.ts")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ContentsString": "export {};" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let service = headless_service(test_client(&server), 10);
    let resource = router();

    let (first, second) = tokio::join!(
        service.resolve_editor_model(&resource, false),
        service.resolve_editor_model(&resource, false),
    );
    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let opened = service.open(resource).await.unwrap();
    assert!(Arc::ptr_eq(&first, &opened.document));
}

#[tokio::test]
async fn force_refresh_refetches_under_the_same_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(tree_path("github.com/acme/web@main", "src/router.ts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ContentsString": "v" })))
        .expect(2)
        .mount(&server)
        .await;
    let service = headless_service(test_client(&server), 10);
    let resource = router();

    let cached = service.resolve_editor_model(&resource, false).await.unwrap().unwrap();
    let refreshed = service.resolve_editor_model(&resource, true).await.unwrap().unwrap();

    assert!(!Arc::ptr_eq(&cached, &refreshed));
    assert_eq!(cached.id(), refreshed.id());
    assert!(Arc::ptr_eq(
        &refreshed,
        &service.registry().get(&resource).unwrap()
    ));
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    mount_tree_response(
        &server,
        &router(),
        ResponseTemplate::new(500).set_body_string("gitserver unavailable"),
    )
    .await;
    let service = headless_service(test_client(&server), 10);

    let err = service.open(router()).await.unwrap_err();

    match err {
        EditorError::Resolve(FetchError::Status {
            status, message, ..
        }) => {
            assert_eq!(status, 500);
            assert!(message.contains("gitserver unavailable"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_file_is_document_not_found() {
    let server = MockServer::start().await;
    mount_tree_response(&server, &router(), ResponseTemplate::new(404)).await;
    let service = headless_service(test_client(&server), 10);

    let err = service.open(router()).await.unwrap_err();

    assert_matches!(err, EditorError::DocumentNotFound(resource) if resource == router());
    assert_eq!(service.registry().len(), 0);
}

#[tokio::test]
async fn missing_contents_opens_an_empty_document() {
    let server = MockServer::start().await;
    mount_tree_response(
        &server,
        &router(),
        ResponseTemplate::new(200).set_body_json(json!({ "Name": "router.ts" })),
    )
    .await;
    let service = headless_service(test_client(&server), 10);

    let event = service.open(router()).await.unwrap();

    assert_eq!(event.document.text(), "");
    assert_eq!(event.document.line_count(), 1);
}
