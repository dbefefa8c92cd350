use crate::document::TextDocument;
use crate::error::EditorError;
use crate::error::FetchError;
use crate::error::Result;
use crate::events::Listeners;
use crate::events::Subscription;
use crate::fetcher::ContentFetcher;
use crate::fetcher::ContentSource;
use crate::language::LanguageRegistry;
use crate::registry::ModelRegistry;
use crate::resource::ResourceId;
use crate::selection::SelectionRequest;
use crate::selection::SelectionTarget;
use crate::view_state::ViewStateStore;
use crate::widget::EditorWidget;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

const DEFAULT_DOCUMENT_CAPACITY: usize = 512;
const DEFAULT_VIEW_STATE_CAPACITY: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Documents retained by the model registry.
    #[serde(default = "default_document_capacity")]
    pub document_capacity: usize,

    /// Documents whose view state is remembered.
    #[serde(default = "default_view_state_capacity")]
    pub view_state_capacity: usize,
}

fn default_document_capacity() -> usize {
    DEFAULT_DOCUMENT_CAPACITY
}

fn default_view_state_capacity() -> usize {
    DEFAULT_VIEW_STATE_CAPACITY
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_capacity: default_document_capacity(),
            view_state_capacity: default_view_state_capacity(),
        }
    }
}

/// A navigation request: which file, and optionally where in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceInput {
    pub resource: ResourceId,
    pub selection: Option<SelectionRequest>,
}

impl ResourceInput {
    pub fn new(resource: ResourceId) -> Self {
        Self {
            resource,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: SelectionRequest) -> Self {
        self.selection = Some(selection);
        self
    }
}

impl From<ResourceId> for ResourceInput {
    fn from(resource: ResourceId) -> Self {
        Self::new(resource)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingState {
    /// Nothing bound and nothing resolving.
    Idle,
    /// At least one `open` is waiting on its document.
    Resolving,
    /// A document is attached to the widget.
    Bound,
}

/// Shared access to the widget owned by an [`EditorService`].
pub struct EditorHandle<W> {
    slot: Arc<Mutex<Option<W>>>,
}

impl<W> Clone for EditorHandle<W> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<W: EditorWidget> EditorHandle<W> {
    fn empty() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs `f` against the widget, or returns `None` when none is attached.
    /// The widget is locked for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        self.lock().as_mut().map(f)
    }

    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    fn replace(&self, editor: Option<W>) -> Option<W> {
        std::mem::replace(&mut *self.lock(), editor)
    }

    fn lock(&self) -> MutexGuard<'_, Option<W>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Delivered to listeners once per successful [`EditorService::open`].
pub struct EditorOpenedEvent<W> {
    pub document: Arc<TextDocument>,
    pub editor: EditorHandle<W>,
}

impl<W> Clone for EditorOpenedEvent<W> {
    fn clone(&self) -> Self {
        Self {
            document: Arc::clone(&self.document),
            editor: self.editor.clone(),
        }
    }
}

impl<W> std::fmt::Debug for EditorOpenedEvent<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorOpenedEvent")
            .field("document", &self.document.id())
            .field("resource", self.document.resource())
            .finish()
    }
}

/// Binds resolved documents to a single editor widget.
///
/// Every `open` resolves its document through the [`ModelRegistry`], then
/// saves the outgoing document's view state, swaps documents, restores the
/// incoming one's saved state and applies the requested selection. Opens are
/// not queued: when they overlap, only the most recently started one may
/// touch the widget.
pub struct EditorService<W: EditorWidget> {
    registry: Arc<ModelRegistry>,
    view_states: ViewStateStore,
    editor: EditorHandle<W>,
    listeners: Listeners<EditorOpenedEvent<W>>,
    generation: AtomicU64,
    pending: AtomicUsize,
}

impl<W: EditorWidget> EditorService<W> {
    /// Builds a service with its own registry over `source`, using the
    /// built-in language table.
    pub fn new(source: Arc<dyn ContentSource>, config: &EditorConfig) -> Self {
        let registry = ModelRegistry::new(
            ContentFetcher::new(source),
            LanguageRegistry::default(),
            config.document_capacity,
        );
        Self::with_registry(Arc::new(registry), config)
    }

    /// Builds a service over an existing registry, e.g. one shared with a
    /// prefetcher.
    pub fn with_registry(registry: Arc<ModelRegistry>, config: &EditorConfig) -> Self {
        Self {
            registry,
            view_states: ViewStateStore::new(config.view_state_capacity),
            editor: EditorHandle::empty(),
            listeners: Listeners::new(),
            generation: AtomicU64::new(0),
            pending: AtomicUsize::new(0),
        }
    }

    /// Attaches `editor`, returning the widget it replaces. The bound
    /// document is not re-opened.
    pub fn set_editor(&self, editor: W) -> Option<W> {
        self.editor.replace(Some(editor))
    }

    pub fn take_editor(&self) -> Option<W> {
        self.editor.replace(None)
    }

    /// Handle to the attached widget, if any.
    pub fn editor(&self) -> Option<EditorHandle<W>> {
        self.editor.is_attached().then(|| self.editor.clone())
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn view_states(&self) -> &ViewStateStore {
        &self.view_states
    }

    pub fn state(&self) -> BindingState {
        if self.pending.load(Ordering::SeqCst) > 0 {
            return BindingState::Resolving;
        }
        let bound = self
            .editor
            .with(|editor| editor.document().is_some())
            .unwrap_or(false);
        if bound {
            BindingState::Bound
        } else {
            BindingState::Idle
        }
    }

    /// Registers `listener` for [`EditorOpenedEvent`]s. Any number of
    /// listeners may be registered; each keeps receiving events until its
    /// [`Subscription`] is dropped or disposed.
    pub fn on_did_open_editor(
        &self,
        listener: impl Fn(&EditorOpenedEvent<W>) + Send + Sync + 'static,
    ) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Resolves a document without binding it, e.g. to prefetch. Does not
    /// require a widget.
    pub async fn resolve_editor_model(
        &self,
        resource: &ResourceId,
        force_refresh: bool,
    ) -> std::result::Result<Option<Arc<TextDocument>>, FetchError> {
        self.registry.resolve(resource, force_refresh).await
    }

    /// Navigates the widget to `input`.
    pub async fn open(&self, input: impl Into<ResourceInput>) -> Result<EditorOpenedEvent<W>> {
        let input = input.into();
        if !self.editor.is_attached() {
            return Err(EditorError::EditorUnavailable);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let resolved = {
            let _pending = PendingGuard::enter(&self.pending);
            self.registry.resolve(&input.resource, false).await
        };
        let document =
            resolved?.ok_or_else(|| EditorError::DocumentNotFound(input.resource.clone()))?;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(resource = %input.resource, "dropping superseded open");
            return Err(EditorError::Superseded {
                resource: input.resource,
            });
        }

        self.editor
            .with(|editor| self.bind(editor, &document, input.selection))
            .ok_or(EditorError::EditorUnavailable)?;
        tracing::debug!(resource = %input.resource, id = %document.id(), "opened document");

        let event = EditorOpenedEvent {
            document,
            editor: self.editor.clone(),
        };
        self.listeners.emit(&event);
        Ok(event)
    }

    fn bind(&self, editor: &mut W, document: &Arc<TextDocument>, selection: Option<SelectionRequest>) {
        let current = editor.document();
        let already_bound = current
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, document));
        if !already_bound {
            if let Some(current) = current {
                self.view_states.save(current.id(), editor.save_view_state());
            }
            editor.set_document(Arc::clone(document));
            if let Some(state) = self.view_states.load(document.id()) {
                editor.restore_view_state(&state);
            }
        }

        // The explicit selection wins over whatever was restored.
        if let Some(selection) = selection {
            match selection.target() {
                SelectionTarget::Range(range) => {
                    editor.set_selection(range);
                    editor.reveal_range_in_center(range);
                }
                SelectionTarget::Position(position) => {
                    editor.set_position(position);
                    editor.reveal_position_in_center(position);
                }
            }
        }
        editor.focus();
    }
}

/// Counts an in-flight resolve; decrements even if the `open` future is
/// dropped mid-await.
struct PendingGuard<'a> {
    pending: &'a AtomicUsize,
}

impl<'a> PendingGuard<'a> {
    fn enter(pending: &'a AtomicUsize) -> Self {
        pending.fetch_add(1, Ordering::SeqCst);
        Self { pending }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}
