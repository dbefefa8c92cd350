use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use codeview_async_utils::RetryOptions;
use codeview_backend_client::Client;
use codeview_editor::EditorConfig;
use codeview_editor::EditorService;
use codeview_editor::HeadlessEditor;
use codeview_editor::ResourceId;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

pub use codeview_backend_client::patch_json_config;

/// Looks up `variable` and parses it as JSON, then takes its truthiness.
/// Fails when the variable is unset (or empty) and there is no default, or
/// when the value is not JSON.
pub fn read_env_bool(variable: &str, default: Option<bool>) -> Result<bool> {
    parse_env_bool(variable, std::env::var(variable).ok().as_deref(), default)
}

/// Looks up `variable`. Fails when it is unset (or empty) and there is no
/// default.
pub fn read_env_string(variable: &str, default: Option<&str>) -> Result<String> {
    parse_env_string(variable, std::env::var(variable).ok().as_deref(), default)
}

fn parse_env_bool(variable: &str, value: Option<&str>, default: Option<bool>) -> Result<bool> {
    match value.filter(|value| !value.is_empty()) {
        Some(value) => {
            let parsed: Value = serde_json::from_str(value).with_context(|| {
                format!(
                    "Incorrect environment variable {variable}={value}. Must be truthy or not set at all."
                )
            })?;
            Ok(is_truthy(&parsed))
        }
        None => default.with_context(|| format!("Environment variable {variable} must be set.")),
    }
}

fn parse_env_string(variable: &str, value: Option<&str>, default: Option<&str>) -> Result<String> {
    match value.filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => default
            .map(str::to_string)
            .with_context(|| format!("Environment variable {variable} must be set.")),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Retry schedule for assertions against eventually consistent state:
/// constant one-second spacing instead of exponential backoff.
pub fn retry_options() -> RetryOptions {
    RetryOptions {
        factor: 1.0,
        ..RetryOptions::default()
    }
}

/// Retries `op` with [`retry_options`].
pub async fn retry<F, Fut, T>(op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    codeview_async_utils::retry(op, retry_options()).await
}

/// Path of the tree-entry endpoint for `path` at `repo_rev`.
pub fn tree_path(repo_rev: &str, path: &str) -> String {
    format!("/.api/repos/{repo_rev}/-/tree/{path}")
}

/// Serves `contents` for `resource` from the tree-entry endpoint.
pub async fn mount_tree_entry(server: &MockServer, resource: &ResourceId, contents: &str) {
    mount_tree_response(
        server,
        resource,
        ResponseTemplate::new(200).set_body_json(json!({
            "Name": resource.path,
            "ContentsString": contents,
        })),
    )
    .await;
}

/// Mounts an arbitrary response for `resource`'s tree entry.
pub async fn mount_tree_response(
    server: &MockServer,
    resource: &ResourceId,
    response: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path(tree_path(&resource.repo_rev(), &resource.path)))
        .and(query_param("ContentsAsString", "true"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Answers GraphQL requests for `operation` with `body`.
pub async fn mount_graphql(server: &MockServer, operation: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path("/.api/graphql"))
        .and(query_param(operation, ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Client for `server` with a short timeout.
pub fn test_client(server: &MockServer) -> Client {
    Client::with_options(
        server.uri(),
        codeview_backend_client::ClientOptions {
            timeout: Duration::from_secs(5),
            ..Default::default()
        },
    )
    .expect("build test client")
}

/// Editor service over `client` with a [`HeadlessEditor`] attached.
pub fn headless_service(client: Client, viewport_height: u32) -> EditorService<HeadlessEditor> {
    let service = EditorService::new(Arc::new(client), &EditorConfig::default());
    service.set_editor(HeadlessEditor::new(viewport_height));
    service
}

/// Adds `origin` to the instance's CORS allow list when it is missing.
pub async fn ensure_has_cors_origin(client: &Client, origin: &str) -> Result<()> {
    client
        .ensure_cors_origin(origin)
        .await
        .with_context(|| format!("failed to add CORS origin {origin}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn env_bool_uses_json_truthiness() {
        assert!(parse_env_bool("E2E", Some("true"), None).unwrap());
        assert!(parse_env_bool("E2E", Some("1"), None).unwrap());
        assert!(!parse_env_bool("E2E", Some("0"), Some(true)).unwrap());
        assert!(!parse_env_bool("E2E", Some("false"), None).unwrap());
        assert!(parse_env_bool("E2E", Some("yes"), None).is_err());
    }

    #[test]
    fn unset_env_falls_back_to_default_or_fails() {
        assert!(parse_env_bool("E2E", None, Some(true)).unwrap());
        assert!(!parse_env_bool("E2E", Some(""), Some(false)).unwrap());
        let err = parse_env_bool("E2E", None, None).unwrap_err();
        assert_eq!(err.to_string(), "Environment variable E2E must be set.");

        assert_eq!(
            parse_env_string("URL", None, Some("http://localhost:3080")).unwrap(),
            "http://localhost:3080"
        );
        assert_eq!(
            parse_env_string("URL", Some("https://x"), Some("y")).unwrap(),
            "https://x"
        );
        assert!(parse_env_string("URL", Some(""), None).is_err());
    }

    #[tokio::test]
    async fn retry_returns_first_success() {
        let options = RetryOptions {
            min_timeout: Duration::from_millis(1),
            ..retry_options()
        };
        let value = codeview_async_utils::retry(
            |attempt| async move {
                if attempt < 3 {
                    anyhow::bail!("not yet");
                }
                Ok(attempt)
            },
            options,
        )
        .await
        .unwrap();
        assert_eq!(value, 3);
    }
}
