use serde::Deserialize;
use serde::Serialize;

/// Subset of the tree-entry payload returned by
/// `/.api/repos/{repo}/-/tree/{path}`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TreeEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contents_string: Option<String>,
}

impl TreeEntry {
    /// File text; a missing `ContentsString` is an empty file.
    pub fn into_contents(self) -> String {
        self.contents_string.unwrap_or_default()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Raw GraphQL envelope. `data` and `errors` may both be present.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct GraphQlResult<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl<T> GraphQlResult<T> {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flatten()
            .map(|err| err.message.clone())
            .collect()
    }
}
