use crate::language::LanguageId;
use crate::resource::ResourceId;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Identity of a document in a [`crate::ModelRegistry`]. View state is keyed
/// on it. A refreshed document keeps the id of the one it replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// File text plus its language. Immutable once created; shared as
/// `Arc<TextDocument>` between the registry and the editor.
#[derive(Debug, PartialEq, Eq)]
pub struct TextDocument {
    id: DocumentId,
    resource: ResourceId,
    language: LanguageId,
    text: String,
}

impl TextDocument {
    pub(crate) fn new(
        id: DocumentId,
        resource: ResourceId,
        language: LanguageId,
        text: String,
    ) -> Self {
        Self {
            id,
            resource,
            language,
            text,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn language(&self) -> &LanguageId {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines; an empty document has one empty line.
    pub fn line_count(&self) -> u32 {
        u32::try_from(self.text.split('\n').count()).unwrap_or(u32::MAX)
    }

    /// 1-based line without its terminator.
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        self.text
            .split('\n')
            .nth(index)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }
}
