use crate::client::Client;
use crate::types::GraphQlResult;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

const BLAME_FILE_QUERY: &str = r#"
query BlameFile($repoPath: String, $commitID: String, $filePath: String, $startLine: Int, $endLine: Int) {
    repository(uri: $repoPath) {
        commit(rev: $commitID) {
            file(path: $filePath) {
                blame(startLine: $startLine, endLine: $endLine) {
                    startLine
                    endLine
                    startByte
                    endByte
                    rev
                    author {
                        person {
                            name
                            email
                            gravatarHash
                        }
                        date
                    }
                    message
                }
            }
        }
    }
}
"#;

const BLAME_POINTER: &str = "/repository/commit/file/blame";

/// A file location whose blame is requested. Lines are 1-based and inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlameRequest {
    pub repo_path: String,
    pub commit_id: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl BlameRequest {
    /// Blame for a single line.
    pub fn line(
        repo_path: impl Into<String>,
        commit_id: impl Into<String>,
        file_path: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            repo_path: repo_path.into(),
            commit_id: commit_id.into(),
            file_path: file_path.into(),
            start_line: line,
            end_line: line,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub email: String,
    pub gravatar_hash: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Signature {
    pub person: Person,
    pub date: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    pub start_line: u32,
    pub end_line: u32,
    pub start_byte: u32,
    pub end_byte: u32,
    pub rev: String,
    pub author: Signature,
    pub message: String,
}

impl Client {
    /// Fetches blame hunks for the requested line range.
    ///
    /// Transport failures and responses missing any of
    /// `repository.commit.file.blame` are logged and reported as `None`;
    /// callers cannot tell "no data" from "error" on this path. Successful
    /// lookups are memoized per request.
    pub async fn blame_file(&self, request: &BlameRequest) -> Option<Vec<Hunk>> {
        if let Some(hunks) = self.blame_memo.get(request) {
            return Some(hunks);
        }
        let variables = json!({
            "repoPath": request.repo_path,
            "commitID": request.commit_id,
            "filePath": request.file_path,
            "startLine": request.start_line,
            "endLine": request.end_line,
        });
        let result = match self.graphql::<Value>(BLAME_FILE_QUERY, variables).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, file = %request.file_path, "BlameFile request failed");
                return None;
            }
        };
        let hunks = extract_hunks(&result)?;
        self.blame_memo.insert(request.clone(), hunks.clone());
        Some(hunks)
    }
}

fn extract_hunks(result: &GraphQlResult<Value>) -> Option<Vec<Hunk>> {
    let blame = result
        .data
        .as_ref()
        .and_then(|data| data.pointer(BLAME_POINTER))
        .filter(|value| !value.is_null());
    let Some(blame) = blame else {
        tracing::error!(response = ?result, "unexpected BlameFile response");
        return None;
    };
    match serde_json::from_value(blame.clone()) {
        Ok(hunks) => Some(hunks),
        Err(err) => {
            tracing::error!(error = %err, "malformed blame hunks in BlameFile response");
            None
        }
    }
}
