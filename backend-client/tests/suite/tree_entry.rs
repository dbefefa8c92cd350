use codeview_backend_client::Client;
use codeview_backend_client::ClientOptions;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

const TREE_PATH: &str = "/.api/repos/github.com/gorilla/mux@v1/-/tree/mux.go";

#[tokio::test]
async fn tree_entry_requests_contents_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TREE_PATH))
        .and(query_param("ContentsAsString", "true"))
        .and(query_param("NoSrclibAnns", "true"))
        .and(header("x-requested-with", "codeview"))
        .and(header("authorization", "token s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Name": "mux.go",
            "ContentsString": "package mux\n",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_options(
        server.uri(),
        ClientOptions {
            access_token: Some("s3cret".to_string()),
            ..ClientOptions::default()
        },
    )
    .unwrap();
    let entry = client.tree_entry("github.com/gorilla/mux@v1", "mux.go").await.unwrap();

    assert_eq!(entry.name.as_deref(), Some("mux.go"));
    assert_eq!(entry.into_contents(), "package mux\n");
}

#[tokio::test]
async fn missing_contents_is_an_empty_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TREE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Name": "mux.go" })))
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();
    let entry = client.tree_entry("github.com/gorilla/mux@v1", "mux.go").await.unwrap();

    assert_eq!(entry.into_contents(), "");
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TREE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such file"))
        .mount(&server)
        .await;

    let client = Client::new(format!("{}/", server.uri())).unwrap();
    let err = client
        .tree_entry("github.com/gorilla/mux@v1", "mux.go")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.is_not_found());
    assert!(err.to_string().contains("no such file"), "{err}");
}
