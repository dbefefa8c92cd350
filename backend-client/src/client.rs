use crate::blame::BlameRequest;
use crate::blame::Hunk;
use crate::error::BackendError;
use crate::error::Result;
use crate::types::GraphQlResult;
use crate::types::TreeEntry;
use codeview_utils_cache::BlockingLruCache;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_BLAME_CACHE_CAPACITY: usize = 256;
const REQUESTED_WITH: &str = "codeview";

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub blame_cache_capacity: usize,
    /// Sent with every request after the defaults, so entries here win.
    pub extra_headers: Vec<(String, String)>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
            blame_cache_capacity: DEFAULT_BLAME_CACHE_CAPACITY,
            extra_headers: Vec::new(),
        }
    }
}

/// HTTP client for the tree-contents API and the GraphQL endpoint.
///
/// Cloning is cheap; clones share the connection pool and the blame memo.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    pub(crate) blame_memo: Arc<BlockingLruCache<BlameRequest, Vec<Hunk>>>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .default_headers(default_headers(&options)?)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            blame_memo: Arc::new(BlockingLruCache::with_capacity(
                options.blame_cache_capacity,
            )),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of the tree entry for `path` at `repo_rev`
    /// (`repo` or `repo@rev`).
    pub fn tree_url(&self, repo_rev: &str, path: &str) -> String {
        format!("{}{}", self.base_url, tree_path(repo_rev, path))
    }

    pub async fn tree_entry(&self, repo_rev: &str, path: &str) -> Result<TreeEntry> {
        let url = self.tree_url(repo_rev, path);
        tracing::debug!(%url, "fetching tree entry");
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { url, status, body });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Posts a GraphQL document. The operation name, when the document has
    /// one, is appended to the URL so server logs can tell requests apart.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        request: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQlResult<T>> {
        let url = match operation_name(request) {
            Some(name) => format!("{}/.api/graphql?{name}", self.base_url),
            None => format!("{}/.api/graphql", self.base_url),
        };
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "query": request, "variables": variables }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { url, status, body });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn tree_path(repo_rev: &str, path: &str) -> String {
    format!("/.api/repos/{repo_rev}/-/tree/{path}?ContentsAsString=true&NoSrclibAnns=true")
}

/// Returns `data` when the server reported no errors.
pub fn data_or_errors<T>(result: GraphQlResult<T>, operation: &str) -> Result<T> {
    let messages = result.error_messages();
    if !messages.is_empty() {
        return Err(BackendError::GraphQl(messages));
    }
    result.data.ok_or_else(|| BackendError::MissingData {
        operation: operation.to_string(),
    })
}

/// Name of the first `query` or `mutation` in a GraphQL document.
pub fn operation_name(request: &str) -> Option<&str> {
    let rest = request.trim_start();
    let rest = rest
        .strip_prefix("query")
        .or_else(|| rest.strip_prefix("mutation"))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn default_headers(options: &ClientOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static(REQUESTED_WITH),
    );
    if let Some(token) = &options.access_token {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("token {token}"))?);
    }
    for (name, value) in &options.extra_headers {
        match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => {
                headers.insert(name, HeaderValue::from_str(value)?);
            }
            Err(err) => tracing::warn!(header = %name, error = %err, "skipping invalid header name"),
        }
    }
    Ok(headers)
}
