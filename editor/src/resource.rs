use crate::error::ResourceParseError;
use serde::Deserialize;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use url::Url;

const SCHEME: &str = "git";

/// Locates one file: repository, optional revision, path.
///
/// Identifiers compare component-wise. Different spellings of the same commit
/// (a branch name and its SHA) are distinct identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub repo: String,
    /// `None` means the repository's default branch.
    pub rev: Option<String>,
    pub path: String,
}

impl ResourceId {
    pub fn new(repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            rev: None,
            path: path.into(),
        }
    }

    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// `repo` or `repo@rev`, the form the repository API expects.
    pub fn repo_rev(&self) -> String {
        match &self.rev {
            Some(rev) => format!("{}@{rev}", self.repo),
            None => self.repo.clone(),
        }
    }
}

/// Renders `git://{repo}?{rev}#{path}`; the `?{rev}` part is omitted for the
/// default branch. Characters that would end a component early, or that
/// decoding would alter, are percent-escaped so the output parses back to the
/// same identifier.
impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}://{}", escape(&self.repo))?;
        if let Some(rev) = &self.rev {
            write!(f, "?{}", escape(rev))?;
        }
        write!(f, "#{}", escape(&self.path))
    }
}

impl FromStr for ResourceId {
    type Err = ResourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s)?;
        if url.scheme() != SCHEME {
            return Err(ResourceParseError::UnsupportedScheme(
                url.scheme().to_string(),
            ));
        }
        let host = url.host_str().unwrap_or_default();
        let repo = decode(&format!("{host}{}", url.path()))
            .trim_end_matches('/')
            .to_string();
        if repo.is_empty() {
            return Err(ResourceParseError::MissingRepository);
        }
        let path = url.fragment().map(decode).unwrap_or_default();
        if path.is_empty() {
            return Err(ResourceParseError::MissingPath);
        }
        let rev = url.query().map(decode).filter(|rev| !rev.is_empty());
        Ok(Self { repo, rev, path })
    }
}

fn needs_escape(c: char) -> bool {
    matches!(c, '%' | '#' | '?' | '@' | ':') || c.is_whitespace() || c.is_control()
}

fn escape(component: &str) -> Cow<'_, str> {
    if !component.chars().any(needs_escape) {
        return Cow::Borrowed(component);
    }
    let mut out = String::with_capacity(component.len() + 8);
    let mut buf = [0; 4];
    for c in component.chars() {
        if needs_escape(c) {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}
