use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use codeview_backend_client::ClientOptions;
use codeview_editor::EditorConfig;
use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.toml";
const DEFAULT_ENDPOINT: &str = "http://localhost:3080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BLAME_CACHE_CAPACITY: usize = 256;

pub const HOME_ENV: &str = "CODEVIEW_HOME";
pub const ENDPOINT_ENV: &str = "CODEVIEW_ENDPOINT";
pub const ACCESS_TOKEN_ENV: &str = "CODEVIEW_ACCESS_TOKEN";

/// Settings read from `$CODEVIEW_HOME/config.toml`. Every field is optional
/// in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Base URL of the instance, without the `/.api` suffix.
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub document_capacity: usize,
    pub view_state_capacity: usize,
    pub blame_cache_capacity: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        let editor = EditorConfig::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            document_capacity: editor.document_capacity,
            view_state_capacity: editor.view_state_capacity,
            blame_cache_capacity: DEFAULT_BLAME_CACHE_CAPACITY,
        }
    }
}

impl CliConfig {
    /// Reads `config.toml` under `codeview_home` (a missing file means
    /// defaults), then applies environment overrides.
    pub fn load(codeview_home: &Path) -> Result<Self> {
        let mut config = Self::from_file(&codeview_home.join(CONFIG_FILENAME))?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Overrides the endpoint and token from `lookup`; empty values are
    /// ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV) {
            self.access_token = Some(token);
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            access_token: self.access_token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            blame_cache_capacity: self.blame_cache_capacity,
            ..ClientOptions::default()
        }
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            document_capacity: self.document_capacity,
            view_state_capacity: self.view_state_capacity,
        }
    }
}

/// `$CODEVIEW_HOME` when set, else `~/.codeview`.
pub fn codeview_home() -> Result<PathBuf> {
    if let Ok(env_home) = std::env::var(HOME_ENV)
        && !env_home.is_empty()
    {
        return Ok(PathBuf::from(env_home));
    }
    let mut home = home_dir().ok_or_else(|| anyhow!("Could not locate home directory"))?;
    home.push(".codeview");
    Ok(home)
}
