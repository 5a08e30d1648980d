//! Configuration loading for eldd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.eldhrimnir/config.toml` (user)
//! 3. `/etc/eldhrimnir/config.toml` (system)
//!
//! When neither standard file exists the built-in defaults are used.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.eldhrimnir/secrets.toml` (user, must be 0600)
//! 2. `/etc/eldhrimnir/secrets.toml` (system, must be 0600)
//!
//! Each key falls back to its environment variable when the file lacks it.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{EldhrimnirBuilder, EldhrimnirError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080).
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Time limits, all in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Deadline for both sources of one request (default: 90).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Bound on one generative name translation (default: 10).
    #[serde(default = "default_translation_timeout")]
    pub translation_timeout_secs: u64,
    /// Timeout of each upstream HTTP request (default: 60).
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            translation_timeout_secs: default_translation_timeout(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    90
}

fn default_translation_timeout() -> u64 {
    10
}

fn default_http_timeout() -> u64 {
    60
}

/// Cache maintenance.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Seconds between sweeps of expired entries; 0 disables sweeping
    /// (default: 300).
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    300
}

/// Provider configurations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub chat: Option<ChatProviderConfig>,
    #[serde(default)]
    pub recipes: Option<RecipesProviderConfig>,
}

/// Chat-completion provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Recipe-search provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipesProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub chat: Option<ApiKeySecret>,
    #[serde(default)]
    pub recipes: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("chat", "DEEPSEEK_API_KEY"),
    ("recipes", "SPOONACULAR_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EldhrimnirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            EldhrimnirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `None` means use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(EldhrimnirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".eldhrimnir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/eldhrimnir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Sweep period, or `None` when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.cache.sweep_interval_secs > 0)
            .then(|| Duration::from_secs(self.cache.sweep_interval_secs))
    }

    /// Apply this configuration and the available keys to a builder.
    pub fn configure(
        &self,
        secrets: &Secrets,
        mut builder: EldhrimnirBuilder,
    ) -> EldhrimnirBuilder {
        let limits = &self.server.limits;
        builder = builder
            .join_timeout(Duration::from_secs(limits.request_timeout_secs))
            .translation_timeout(Duration::from_secs(limits.translation_timeout_secs))
            .http_timeout(Duration::from_secs(limits.http_timeout_secs));

        if let Some(key) = secrets.api_key("chat") {
            builder = builder.chat(key);
        }
        if let Some(chat) = &self.providers.chat {
            if let Some(url) = &chat.base_url {
                builder = builder.chat_base_url(url);
            }
            if let Some(model) = &chat.model {
                builder = builder.chat_model(model);
            }
        }

        if let Some(key) = secrets.api_key("recipes") {
            builder = builder.recipes(key);
        }
        if let Some(url) = self.providers.recipes.as_ref().and_then(|r| r.base_url.as_ref()) {
            builder = builder.recipes_base_url(url);
        }

        builder
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".eldhrimnir").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/eldhrimnir/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load one secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            EldhrimnirError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            EldhrimnirError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            EldhrimnirError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(EldhrimnirError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Get API key for a provider, falling back to the corresponding environment variable.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        let from_file = match provider {
            "chat" => self.chat.as_ref(),
            "recipes" => self.recipes.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == provider)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
                .filter(|key| !key.is_empty())
        })
    }
}
