use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ProxyError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub state: StateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Transport timeout in seconds (0 = reqwest default, no timeout)
    pub timeout_seconds: u64,
    /// File holding a bearer token, used when no credential has been configured
    pub token_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffPolicy {
    /// `exponential_base_seconds + exponential_factor ^ attempt`
    Exponential,
    /// Uniform delay between `random_min_seconds` and `random_max_seconds`
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries allowed for throttled responses before they are surfaced
    pub max_retries: u32,
    /// Also treat 408 Request Timeout as throttling
    pub retry_on_timeout: bool,
    pub backoff: BackoffPolicy,
    pub exponential_base_seconds: f64,
    pub exponential_factor: f64,
    pub random_min_seconds: f64,
    pub random_max_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// JSON file holding the credential and both caches between invocations
    pub path: String,
    /// Write the session back after every CLI command
    pub persist: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::API_BASE_URL.to_string(),
            timeout_seconds: 30,
            token_file: crate::AGENT_TOKEN_FILE.to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_on_timeout: true,
            backoff: BackoffPolicy::Exponential,
            exponential_base_seconds: 0.5,
            exponential_factor: 1.4,
            random_min_seconds: 1.0,
            random_max_seconds: 3.0,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: "spacetraders_state.json".to_string(),
            persist: true,
        }
    }
}

impl ProxyConfig {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create(config_path: &str) -> Result<Self> {
        if Path::new(config_path).exists() {
            info!("Loading configuration from {}", config_path);
            let config_str = fs::read_to_string(config_path)?;
            let config: ProxyConfig = toml::from_str(&config_str)?;
            config.validate()?;
            Ok(config)
        } else {
            info!("Creating default configuration at {}", config_path);
            let config = ProxyConfig::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, config_path: &str) -> Result<()> {
        if let Some(parent) = Path::new(config_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let config_str = toml::to_string_pretty(self)?;
        fs::write(config_path, config_str)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ProxyError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        let retry = &self.retry;
        if retry.exponential_base_seconds < 0.0 || retry.exponential_factor < 1.0 {
            return Err(ProxyError::Config(
                "retry.exponential_base_seconds must be >= 0 and retry.exponential_factor >= 1".to_string(),
            ));
        }
        if retry.random_min_seconds < 0.0 || retry.random_max_seconds < retry.random_min_seconds {
            return Err(ProxyError::Config(
                "retry.random_min_seconds must be >= 0 and <= retry.random_max_seconds".to_string(),
            ));
        }

        if self.state.path.trim().is_empty() {
            return Err(ProxyError::Config("state.path must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Read a bearer token from a file, trimming surrounding whitespace.
pub fn load_agent_token(path: &str) -> Result<Option<String>> {
    if !Path::new(path).exists() {
        return Ok(None);
    }
    let token = fs::read_to_string(path)
        .map_err(|e| ProxyError::Config(format!("Failed to read {}: {}", path, e)))?
        .trim()
        .to_string();
    Ok(if token.is_empty() { None } else { Some(token) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: ProxyConfig = toml::from_str("[retry]\nmax_retries = 2\n").unwrap();
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.backoff, BackoffPolicy::Exponential);
        assert_eq!(config.api.base_url, crate::API_BASE_URL);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_inverted_random_bounds() {
        let mut config = ProxyConfig::default();
        config.retry.random_min_seconds = 4.0;
        config.retry.random_max_seconds = 1.0;
        assert!(matches!(config.validate(), Err(ProxyError::Config(_))));
    }

    #[test]
    fn load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.toml");
        let path = path.to_str().unwrap();

        let created = ProxyConfig::load_or_create(path).unwrap();
        assert!(Path::new(path).exists());
        let reloaded = ProxyConfig::load_or_create(path).unwrap();
        assert_eq!(created.retry.max_retries, reloaded.retry.max_retries);
        assert_eq!(created.state.path, reloaded.state.path);
    }

    #[test]
    fn token_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AGENT_TOKEN");
        fs::write(&path, "  abc.def \n").unwrap();
        let token = load_agent_token(path.to_str().unwrap()).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def"));
        assert_eq!(load_agent_token(dir.path().join("missing").to_str().unwrap()).unwrap(), None);
    }
}
