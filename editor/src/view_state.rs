use crate::document::DocumentId;
use crate::selection::Position;
use crate::selection::Range;
use codeview_utils_cache::BlockingLruCache;
use serde::Deserialize;
use serde::Serialize;

/// Cursor, selection and scroll offset of one document, captured when the
/// editor navigates away from it. Only widgets interpret the fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub cursor: Position,
    pub selection: Option<Range>,
    /// First visible line, 1-based.
    pub scroll_top_line: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            cursor: Position::default(),
            selection: None,
            scroll_top_line: 1,
        }
    }
}

/// Last saved [`ViewState`] per document, bounded with LRU eviction.
pub struct ViewStateStore {
    states: BlockingLruCache<DocumentId, ViewState>,
}

impl ViewStateStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            states: BlockingLruCache::with_capacity(capacity),
        }
    }

    /// Overwrites any state previously saved for `document`.
    pub fn save(&self, document: DocumentId, state: ViewState) {
        tracing::trace!(%document, ?state, "saving view state");
        self.states.insert(document, state);
    }

    pub fn load(&self, document: DocumentId) -> Option<ViewState> {
        self.states.get(&document)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
