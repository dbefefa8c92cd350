use codeview_backend_client::BlameRequest;
use codeview_backend_client::Client;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use tracing_test::traced_test;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn blame_response(blame: Value) -> Value {
    json!({
        "data": {
            "repository": { "commit": { "file": { "blame": blame } } }
        }
    })
}

fn hunk(start: u32, end: u32, rev: &str) -> Value {
    json!({
        "startLine": start,
        "endLine": end,
        "startByte": 0,
        "endByte": 120,
        "rev": rev,
        "author": {
            "person": {
                "name": "Gopher",
                "email": "gopher@example.com",
                "gravatarHash": "abc123"
            },
            "date": "2017-03-01T12:00:00Z"
        },
        "message": "route: add host matching"
    })
}

fn request() -> BlameRequest {
    BlameRequest::line("github.com/gorilla/mux", "c0ffee", "route.go", 12)
}

#[tokio::test]
async fn blame_file_sends_variables_and_memoizes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/.api/graphql"))
        .and(body_partial_json(json!({
            "variables": {
                "repoPath": "github.com/gorilla/mux",
                "commitID": "c0ffee",
                "filePath": "route.go",
                "startLine": 12,
                "endLine": 12,
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(blame_response(json!([hunk(10, 14, "c0ffee")]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();
    let first = client.blame_file(&request()).await.unwrap();
    let second = client.blame_file(&request()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].start_line, 10);
    assert_eq!(first[0].end_line, 14);
    assert_eq!(first[0].author.person.name, "Gopher");
    assert_eq!(first[0].message, "route: add host matching");
}

#[tokio::test]
async fn operation_name_is_in_the_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/.api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(blame_response(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();
    client.blame_file(&request()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("BlameFile"));
}

#[tokio::test]
#[traced_test]
async fn missing_nested_field_yields_none_and_is_not_memoized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/.api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "repository": { "commit": null } }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();

    assert_eq!(client.blame_file(&request()).await, None);
    assert_eq!(client.blame_file(&request()).await, None);
    assert!(logs_contain("unexpected BlameFile response"));
}

#[tokio::test]
#[traced_test]
async fn server_error_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/.api/graphql"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = Client::new(server.uri()).unwrap();

    assert_eq!(client.blame_file(&request()).await, None);
    assert!(logs_contain("BlameFile request failed"));
}
