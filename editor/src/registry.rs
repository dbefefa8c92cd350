use crate::document::DocumentId;
use crate::document::TextDocument;
use crate::error::FetchError;
use crate::fetcher::ContentFetcher;
use crate::language::LanguageRegistry;
use crate::resource::ResourceId;
use codeview_utils_cache::BlockingLruCache;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Owns the in-memory documents, at most one per [`ResourceId`].
///
/// The registry is bounded; the least recently resolved document is evicted
/// once capacity is reached. An evicted document that is still bound to an
/// editor stays alive through its `Arc`, but the next resolve of its resource
/// fetches a new instance.
pub struct ModelRegistry {
    fetcher: ContentFetcher,
    languages: LanguageRegistry,
    documents: BlockingLruCache<ResourceId, Arc<TextDocument>>,
    next_id: AtomicU64,
}

impl ModelRegistry {
    pub fn new(fetcher: ContentFetcher, languages: LanguageRegistry, capacity: usize) -> Self {
        Self {
            fetcher,
            languages,
            documents: BlockingLruCache::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the retained document without any I/O.
    pub fn get(&self, resource: &ResourceId) -> Option<Arc<TextDocument>> {
        self.documents.get(resource)
    }

    /// Returns the document for `resource`, fetching it when it is not
    /// retained or when `force_refresh` is set.
    ///
    /// `Ok(None)` means the backend has no such file. When concurrent resolves
    /// race, the first one to insert wins and later completions return the
    /// winner; a refresh always replaces the retained instance.
    pub async fn resolve(
        &self,
        resource: &ResourceId,
        force_refresh: bool,
    ) -> Result<Option<Arc<TextDocument>>, FetchError> {
        if !force_refresh && let Some(document) = self.documents.get(resource) {
            tracing::trace!(%resource, id = %document.id(), "document already resolved");
            return Ok(Some(document));
        }

        let text = match self.fetcher.fetch(resource).await {
            Ok(text) => text,
            Err(FetchError::NotFound { .. }) => {
                tracing::debug!(%resource, "document not found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let language = self.languages.classify(&resource.path);

        if force_refresh {
            let id = self
                .documents
                .get(resource)
                .map(|previous| previous.id())
                .unwrap_or_else(|| self.allocate_id());
            let document = Arc::new(TextDocument::new(id, resource.clone(), language, text));
            self.documents.insert(resource.clone(), Arc::clone(&document));
            tracing::debug!(%resource, %id, "document refreshed");
            return Ok(Some(document));
        }

        let candidate = Arc::new(TextDocument::new(
            self.allocate_id(),
            resource.clone(),
            language,
            text,
        ));
        // A concurrent resolve may have inserted while this one was fetching.
        let document = self
            .documents
            .get_or_insert(resource.clone(), Arc::clone(&candidate));
        if Arc::ptr_eq(&document, &candidate) {
            tracing::debug!(
                %resource,
                id = %document.id(),
                language = %document.language(),
                "document created"
            );
        }
        Ok(Some(document))
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn allocate_id(&self) -> DocumentId {
        DocumentId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}
