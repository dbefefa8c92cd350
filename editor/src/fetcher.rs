use crate::error::FetchError;
use crate::resource::ResourceId;
use async_trait::async_trait;
use codeview_async_utils::Singleflight;
use codeview_backend_client::BackendError;
use codeview_backend_client::Client;
use std::sync::Arc;

/// Somewhere file text can be loaded from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_contents(&self, resource: &ResourceId) -> Result<String, FetchError>;
}

#[async_trait]
impl ContentSource for Client {
    async fn fetch_contents(&self, resource: &ResourceId) -> Result<String, FetchError> {
        match self.tree_entry(&resource.repo_rev(), &resource.path).await {
            Ok(entry) => Ok(entry.into_contents()),
            Err(err) => Err(fetch_error(resource, &err)),
        }
    }
}

fn fetch_error(resource: &ResourceId, err: &BackendError) -> FetchError {
    if err.is_not_found() {
        return FetchError::NotFound {
            resource: resource.clone(),
        };
    }
    match err.status() {
        Some(status) => FetchError::Status {
            resource: resource.clone(),
            status: status.as_u16(),
            message: err.to_string(),
        },
        None => FetchError::Transport {
            resource: resource.clone(),
            message: err.to_string(),
        },
    }
}

/// Loads document text, collapsing concurrent requests for the same
/// resource into one call to the underlying [`ContentSource`].
pub struct ContentFetcher {
    source: Arc<dyn ContentSource>,
    flights: Singleflight<ResourceId, Result<String, FetchError>>,
}

impl ContentFetcher {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            flights: Singleflight::new(),
        }
    }

    pub async fn fetch(&self, resource: &ResourceId) -> Result<String, FetchError> {
        let source = Arc::clone(&self.source);
        let key = resource.clone();
        self.flights
            .run(resource.clone(), move || async move {
                tracing::debug!(resource = %key, "fetching document contents");
                let result = source.fetch_contents(&key).await;
                if let Err(err) = &result {
                    tracing::warn!(resource = %key, error = %err, "document fetch failed");
                }
                result
            })
            .await
    }

    /// Requests currently awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.flights.in_flight()
    }
}
