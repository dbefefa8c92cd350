use once_cell::sync::Lazy;
use serde::Deserialize;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Syntax-highlighting mode for a document, e.g. `go` or `typescript`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(Cow<'static, str>);

impl LanguageId {
    pub const PLAIN_TEXT: LanguageId = LanguageId::from_static("plaintext");

    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait LanguageMatcher: Send + Sync {
    fn path_matches(&self, path: &str) -> Option<LanguageId>;
}

impl<F> LanguageMatcher for F
where
    F: Fn(&str) -> Option<LanguageId> + Send + Sync,
{
    fn path_matches(&self, path: &str) -> Option<LanguageId> {
        self(path)
    }
}

/// Matches when the path ends with any of the suffixes. Comparison is
/// case-sensitive: `a.PY` is not `.py`.
pub struct SuffixMatcher {
    suffixes: Vec<Cow<'static, str>>,
    language: LanguageId,
}

impl SuffixMatcher {
    pub fn new<I, S>(suffixes: I, language: LanguageId) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            language,
        }
    }
}

impl LanguageMatcher for SuffixMatcher {
    fn path_matches(&self, path: &str) -> Option<LanguageId> {
        self.suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_ref()))
            .then(|| self.language.clone())
    }
}

const BUILTIN_SUFFIXES: &[(&[&str], &str)] = &[
    (&[".go"], "go"),
    (&[".js", ".jsx"], "javascript"),
    (&[".ts", ".tsx"], "typescript"),
    (&[".py"], "python"),
    (&[".html"], "html"),
    (&[".css"], "css"),
    (&[".php"], "php"),
    (&[".java"], "java"),
    (&[".scala"], "scala"),
];

/// Ordered list of matchers; the first one that claims a path decides its
/// language, and paths nobody claims fall back to plain text.
pub struct LanguageRegistry {
    matchers: Vec<Box<dyn LanguageMatcher>>,
    fallback: LanguageId,
}

impl LanguageRegistry {
    /// A registry with no matchers; everything classifies as plain text.
    pub fn empty() -> Self {
        Self {
            matchers: Vec::new(),
            fallback: LanguageId::PLAIN_TEXT,
        }
    }

    /// Appends a matcher. Earlier matchers take precedence.
    pub fn register(&mut self, matcher: impl LanguageMatcher + 'static) -> &mut Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn classify(&self, path: &str) -> LanguageId {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.path_matches(path))
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (suffixes, language) in BUILTIN_SUFFIXES {
            registry.register(SuffixMatcher::new(
                suffixes.iter().copied(),
                LanguageId::from_static(language),
            ));
        }
        registry
    }
}

static DEFAULT_REGISTRY: Lazy<LanguageRegistry> = Lazy::new(LanguageRegistry::default);

/// Classifies `path` with the built-in suffix table.
pub fn classify(path: &str) -> LanguageId {
    DEFAULT_REGISTRY.classify(path)
}
