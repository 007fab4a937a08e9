//! Connection configuration files issued by the Serenity API Management UI.
//!
//! Files live in `$HOME/.serenity/{config_id}.json` by default. Schema
//! version 1 derives the endpoint from environment and region; version 2
//! carries the URL and OAuth scope explicitly.

use crate::domain::errors::{SerenityError, SerenityResult};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const REQUIRED_KEYS: [&str; 5] = [
    "schemaVersion",
    "tenantId",
    "clientId",
    "userApplicationId",
    "userApplicationSecret",
];

const REQUIRED_KEYS_V2: [&str; 3] = ["url", "scope", "environment"];

/// Operational environment (dev vs. UAT vs. production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Dev,
    Test,
    #[default]
    Production,
}

impl Environment {
    /// Hostname fragment; empty for production
    pub fn value(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Test => "test",
            Environment::Production => "",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Test => "TEST",
            Environment::Production => "PRODUCTION",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Environment {
    type Err = SerenityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEV" => Ok(Environment::Dev),
            "TEST" => Ok(Environment::Test),
            "PRODUCTION" => Ok(Environment::Production),
            _ => Err(SerenityError::invalid_config(format!(
                "unknown environment: {}. Must be DEV, TEST or PRODUCTION",
                s
            ))),
        }
    }
}

/// Regional installation. Only affects derived hostnames for schema version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Global,
    EastUs,
    EastUs2,
}

impl Region {
    pub fn value(&self) -> &'static str {
        match self {
            Region::Global => "",
            Region::EastUs => "eastus",
            Region::EastUs2 => "eastus2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub schema_version: u8,
    pub tenant_id: String,
    pub client_id: String,
    pub user_application_id: String,
    pub user_application_secret: String,
    pub env: Environment,
    pub region: Region,
    url: Option<String>,
    scope: Option<String>,
}

impl ConnectionConfig {
    /// Build a configuration from parsed JSON; `config_path` only feeds error messages.
    pub fn from_json(config: &Value, config_path: &str) -> SerenityResult<Self> {
        let object = config.as_object().ok_or_else(|| {
            SerenityError::invalid_config(format!("{} invalid: expected a JSON object", config_path))
        })?;

        let present: Vec<&str> = object.keys().map(String::as_str).collect();
        if !REQUIRED_KEYS.iter().all(|key| object.contains_key(*key)) {
            return Err(SerenityError::invalid_config(format!(
                "{} invalid. Required keys: {:?}; got: {:?}",
                config_path, REQUIRED_KEYS, present
            )));
        }

        let schema_version = match object.get("schemaVersion").and_then(Value::as_u64) {
            Some(1) => 1,
            Some(2) => 2,
            other => {
                return Err(SerenityError::invalid_config(format!(
                    "only schemaVersion 1 or 2 is supported; {} is version {:?}",
                    config_path, other
                )));
            }
        };

        let text = |key: &str| -> SerenityResult<String> {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    SerenityError::invalid_config(format!("{}: {} must be a string", config_path, key))
                })
        };

        let (env, region, url, scope) = if schema_version == 2 {
            if !REQUIRED_KEYS_V2.iter().all(|key| object.contains_key(*key)) {
                return Err(SerenityError::invalid_config(format!(
                    "{} invalid. Schema version 2 also requires: {:?}; got: {:?}",
                    config_path, REQUIRED_KEYS_V2, present
                )));
            }
            let env: Environment = text("environment")?.parse()?;
            let region = if env == Environment::Production {
                Region::Global
            } else {
                Region::EastUs
            };
            (env, region, Some(text("url")?), Some(text("scope")?))
        } else {
            (Environment::Production, Region::Global, None, None)
        };

        Ok(Self {
            schema_version,
            tenant_id: text("tenantId")?,
            client_id: text("clientId")?,
            user_application_id: text("userApplicationId")?,
            user_application_secret: text("userApplicationSecret")?,
            env,
            region,
            url,
            scope,
        })
    }

    /// OAuth scopes used when acquiring the access token
    pub fn get_scopes(&self) -> Vec<String> {
        match &self.scope {
            Some(scope) => vec![scope.clone()],
            None => vec![format!(
                "https://serenity-api{}.cloudwall.network/.default",
                self.host_suffix()
            )],
        }
    }

    /// Base URL for all API requests
    pub fn get_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("https://serenity-rest{}.cloudwall.network", self.host_suffix()),
        }
    }

    fn host_suffix(&self) -> String {
        [self.env.value(), self.region.value()]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| format!("-{}", part))
            .collect()
    }
}

/// Read `{config_dir}/{config_id}.json`, defaulting the directory to `$HOME/.serenity`.
pub fn load_local_config(config_id: &str, config_dir: Option<&Path>) -> SerenityResult<ConnectionConfig> {
    let dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_config_dir()?,
    };
    let config_path = dir.join(format!("{}.json", config_id));
    let contents = std::fs::read_to_string(&config_path)?;
    let config: Value = serde_json::from_str(&contents)?;
    ConnectionConfig::from_json(&config, &config_path.display().to_string())
}

fn default_config_dir() -> SerenityResult<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".serenity"))
        .ok_or_else(|| SerenityError::invalid_config("cannot locate home directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v1_config() -> Value {
        json!({
            "schemaVersion": 1,
            "tenantId": "tenant.cloudwall.network",
            "clientId": "client",
            "userApplicationId": "app",
            "userApplicationSecret": "secret"
        })
    }

    #[test]
    fn test_v1_derives_production_urls() {
        let config = ConnectionConfig::from_json(&v1_config(), "v1.json").unwrap();
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.region, Region::Global);
        assert_eq!(config.get_url(), "https://serenity-rest.cloudwall.network");
        assert_eq!(
            config.get_scopes(),
            vec!["https://serenity-api.cloudwall.network/.default"]
        );
    }

    #[test]
    fn test_v1_suffix_with_env_and_region() {
        let mut config = ConnectionConfig::from_json(&v1_config(), "v1.json").unwrap();
        config.env = Environment::Dev;
        config.region = Region::EastUs;
        assert_eq!(config.get_url(), "https://serenity-rest-dev-eastus.cloudwall.network");
        assert_eq!(
            config.get_scopes()[0],
            "https://serenity-api-dev-eastus.cloudwall.network/.default"
        );
    }

    #[test]
    fn test_missing_keys_are_listed() {
        let err = ConnectionConfig::from_json(&json!({"schemaVersion": 2}), "bad.json").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.json"));
        assert!(msg.contains("tenantId"));
    }

    #[test]
    fn test_unsupported_schema_version() {
        let mut raw = v1_config();
        raw["schemaVersion"] = json!(3);
        assert!(matches!(
            ConnectionConfig::from_json(&raw, "v3.json"),
            Err(SerenityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_v2_requires_url_scope_environment() {
        let mut raw = v1_config();
        raw["schemaVersion"] = json!(2);
        assert!(ConnectionConfig::from_json(&raw, "v2.json").is_err());

        raw["url"] = json!("https://serenity-rest.example.dev.cloudwall.network");
        raw["scope"] = json!("https://serenity-api-dev.example.cloudwall.network/.default");
        raw["environment"] = json!("TEST");
        let config = ConnectionConfig::from_json(&raw, "v2.json").unwrap();
        assert_eq!(config.env, Environment::Test);
        assert_eq!(config.region, Region::EastUs);
        assert_eq!(config.get_url(), "https://serenity-rest.example.dev.cloudwall.network");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_names_are_case_sensitive() {
        assert!("dev".parse::<Environment>().is_err());
        assert!("Production".parse::<Environment>().is_err());

        let mut raw = v1_config();
        raw["schemaVersion"] = json!(2);
        raw["url"] = json!("https://serenity-rest.example.dev.cloudwall.network");
        raw["scope"] = json!("https://serenity-api-dev.example.cloudwall.network/.default");
        raw["environment"] = json!("test");
        assert!(matches!(
            ConnectionConfig::from_json(&raw, "v2.json"),
            Err(SerenityError::InvalidConfig(_))
        ));
    }
}
