//! Client configuration
//!
//! Settings are resolved in precedence order:
//! 1. explicit overrides (command line flags)
//! 2. environment variables `KLD_API_URL` / `KLD_API_KEY`
//! 3. YAML config file (`--config`, or `$HOME/.kld.yaml` when present)
//!
//! ```yaml
//! api:
//!   url: https://console.kaleido.io/api/v1
//!   key: <api key>
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{KldError, Result};

pub const API_URL_ENV: &str = "KLD_API_URL";
pub const API_KEY_ENV: &str = "KLD_API_KEY";

/// Config file searched in the home directory when no `--config` is given
pub const DEFAULT_CONFIG_FILENAME: &str = ".kld.yaml";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved settings for talking to the provisioning API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub api_key: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

/// Values supplied on the command line; each one wins over env and file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiSection,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    url: Option<String>,
    key: Option<String>,
}

impl ClientConfig {
    /// Resolve from overrides, the process environment and the config file
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::resolve_with(overrides, |key| std::env::var(key).ok(), home.as_deref())
    }

    /// Resolution with injectable environment lookup and home directory
    pub fn resolve_with<F>(overrides: &ConfigOverrides, env: F, home: Option<&Path>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &overrides.config_file {
            Some(path) => load_config_file(path)?,
            None => match home.map(|h| h.join(DEFAULT_CONFIG_FILENAME)) {
                Some(path) if path.exists() => load_config_file(&path)?,
                Some(path) => {
                    info!(
                        path = %path.display(),
                        "No config file found, relying on environment variables"
                    );
                    ConfigFile::default()
                }
                None => ConfigFile::default(),
            },
        };

        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| env(API_URL_ENV))
            .or(file.api.url)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                KldError::Config(format!("API URL not set (use --api-url or {API_URL_ENV})"))
            })?;

        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| env(API_KEY_ENV))
            .or(file.api.key)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                KldError::Config(format!("API key not set (use --api-key or {API_KEY_ENV})"))
            })?;

        let api_url = Url::parse(&api_url)
            .map_err(|e| KldError::Config(format!("Invalid API URL '{api_url}': {e}")))?;

        debug!(api_url = %api_url, "Resolved client configuration");

        Ok(Self {
            api_url,
            api_key,
            timeout: DEFAULT_HTTP_TIMEOUT,
        })
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        KldError::Config(format!("Can't read config {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&content)
        .map_err(|e| KldError::Config(format!("Can't parse config {}: {e}", path.display())))
}
