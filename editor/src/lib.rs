//! Document cache and editor binding for browsing repository files.
//!
//! File text is fetched through a [`ContentSource`], deduplicated while in
//! flight, classified by language and cached as shared [`TextDocument`]s in a
//! [`ModelRegistry`]. An [`EditorService`] binds those documents to a single
//! [`EditorWidget`], remembering each document's [`ViewState`] across
//! navigations.

mod document;
mod error;
mod events;
mod fetcher;
mod language;
mod registry;
mod resource;
mod selection;
mod service;
mod view_state;
mod widget;

pub use document::DocumentId;
pub use document::TextDocument;
pub use error::EditorError;
pub use error::FetchError;
pub use error::ResourceParseError;
pub use error::Result;
pub use events::Subscription;
pub use fetcher::ContentFetcher;
pub use fetcher::ContentSource;
pub use language::LanguageId;
pub use language::LanguageMatcher;
pub use language::LanguageRegistry;
pub use language::SuffixMatcher;
pub use language::classify;
pub use registry::ModelRegistry;
pub use resource::ResourceId;
pub use selection::Position;
pub use selection::Range;
pub use selection::SelectionRequest;
pub use selection::SelectionTarget;
pub use service::BindingState;
pub use service::EditorConfig;
pub use service::EditorHandle;
pub use service::EditorOpenedEvent;
pub use service::EditorService;
pub use service::ResourceInput;
pub use view_state::ViewState;
pub use view_state::ViewStateStore;
pub use widget::EditorWidget;
pub use widget::HeadlessEditor;
pub use widget::Reveal;
