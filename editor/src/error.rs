use crate::resource::ResourceId;
use thiserror::Error;

/// Failure to load a document's text. Cloneable so one failed fetch can be
/// reported to every caller that was waiting on it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{resource} not found")]
    NotFound { resource: ResourceId },

    #[error("fetching {resource} failed with HTTP {status}: {message}")]
    Status {
        resource: ResourceId,
        status: u16,
        message: String,
    },

    #[error("fetching {resource} failed: {message}")]
    Transport { resource: ResourceId, message: String },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NotFound { .. } => Some(404),
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { .. } => None,
        }
    }

    pub fn resource(&self) -> &ResourceId {
        match self {
            FetchError::NotFound { resource }
            | FetchError::Status { resource, .. }
            | FetchError::Transport { resource, .. } => resource,
        }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    /// No widget is attached. Raised before any I/O happens.
    #[error("editor not available")]
    EditorUnavailable,

    #[error(transparent)]
    Resolve(#[from] FetchError),

    #[error("model not found: {0}")]
    DocumentNotFound(ResourceId),

    /// A later `open` started while this one was resolving; its result was
    /// dropped without touching the editor.
    #[error("open of {resource} superseded by a later navigation")]
    Superseded { resource: ResourceId },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceParseError {
    #[error("invalid resource URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("unsupported resource scheme {0:?}, expected \"git\"")]
    UnsupportedScheme(String),

    #[error("resource URI has no repository")]
    MissingRepository,

    #[error("resource URI has no file path")]
    MissingPath,
}

pub type Result<T> = std::result::Result<T, EditorError>;
