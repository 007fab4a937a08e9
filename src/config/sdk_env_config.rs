//! HTTP and connection settings read from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AUTH_HOST: &str = "https://login.microsoftonline.com";

#[derive(Debug, Clone, PartialEq)]
pub struct SdkEnvConfig {
    pub config_id: Option<String>,
    pub config_dir: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    pub http_max_retries: u32,
    pub auth_host: String,
}

impl Default for SdkEnvConfig {
    fn default() -> Self {
        Self {
            config_id: None,
            config_dir: None,
            http_timeout_secs: 30,
            http_connect_timeout_secs: 10,
            http_max_retries: 3,
            auth_host: DEFAULT_AUTH_HOST.to_string(),
        }
    }
}

impl SdkEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SdkEnvConfig::from_env`] but reads through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            config_id: lookup("SERENITY_CONFIG_ID").filter(|s| !s.is_empty()),
            config_dir: lookup("SERENITY_CONFIG_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            http_timeout_secs: lookup("SERENITY_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.http_timeout_secs),
            http_connect_timeout_secs: lookup("SERENITY_HTTP_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.http_connect_timeout_secs),
            http_max_retries: lookup("SERENITY_HTTP_MAX_RETRIES")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.http_max_retries),
            auth_host: lookup("SERENITY_AUTH_HOST")
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.auth_host),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http_connect_timeout_secs)
    }
}
