//! API path bookkeeping: which operations exist, what verb they use by
//! default, and how legacy path spellings map onto the configured paths.
//!
//! The risk and VaR endpoints were renamed when the API moved to its uniform
//! path scheme. Both spellings are accepted; the configured spelling is what
//! goes on the wire.

use crate::config::Environment;
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::CallType;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Configured path → alternate spelling
const PATH_ALIASES: [(&str, &str); 9] = [
    ("/risk/market/factor/asset_covariance", "/risk/asset/covariance"),
    ("/risk/market/factor/attribution", "/risk/compute/attribution"),
    ("/risk/market/factor/correlation", "/risk/factor/correlation"),
    ("/risk/market/factor/covariance", "/risk/factor/covariance"),
    ("/risk/market/factor/exposures", "/risk/asset/factor/exposures"),
    ("/risk/market/factor/residual_covariance", "/risk/asset/residual/covariance"),
    ("/risk/market/factor/returns", "/risk/factor/returns"),
    ("/risk/var/compute", "/risk/compute/var"),
    ("/risk/var/backtest", "/risk/backtest/var"),
];

/// `{id}` marks a segment holding a UUID or an integer
const PATH_CONFIGS: [(&str, CallType); 38] = [
    // refdata
    ("/refdata/asset/summaries", CallType::Get),
    ("/refdata/asset/types", CallType::Get),
    ("/refdata/symbol/authorities", CallType::Get),
    ("/refdata/sector/taxonomies", CallType::Get),
    // model metadata
    ("/catalog/model/modelclasses", CallType::Get),
    ("/catalog/model/models", CallType::Get),
    ("/catalog/model/modelconfigurations", CallType::Get),
    // factor risk
    ("/risk/market/factor/asset_covariance", CallType::Get),
    ("/risk/market/factor/attribution", CallType::Post),
    ("/risk/market/factor/correlation", CallType::Get),
    ("/risk/market/factor/covariance", CallType::Get),
    ("/risk/market/factor/exposures", CallType::Get),
    ("/risk/market/factor/indexcomps", CallType::Get),
    ("/risk/market/factor/residual_covariance", CallType::Get),
    ("/risk/market/factor/returns", CallType::Get),
    // VaR
    ("/risk/var/compute", CallType::Post),
    ("/risk/var/backtest", CallType::Post),
    // valuation
    ("/valuation/portfolio/compute", CallType::Post),
    // pricing
    ("/pricing/derivatives/options/valuation", CallType::Post),
    ("/pricing/derivatives/options/underliers", CallType::Get),
    ("/pricing/derivatives/options/listed", CallType::Get),
    ("/pricing/curves/rates/definitions", CallType::Get),
    ("/pricing/curves/rates/{id}", CallType::Get),
    ("/pricing/curves/rates/{id}/versions", CallType::Get),
    ("/pricing/volsurfaces/definitions", CallType::Get),
    ("/pricing/volsurfaces/{id}", CallType::Get),
    ("/pricing/volsurfaces/{id}/versions", CallType::Get),
    // scenarios
    ("/risk/scenarios/custom", CallType::Get),
    ("/risk/scenarios/custom/clone", CallType::Post),
    ("/risk/scenarios/custom/{id}", CallType::Put),
    ("/risk/scenarios/custom/{id}/rollback/{id}", CallType::Post),
    ("/risk/scenarios/custom/{id}/versions", CallType::Get),
    ("/risk/scenarios/predefined", CallType::Get),
    ("/risk/scenarios/{id}", CallType::Get),
    ("/risk/scenarios/run", CallType::Post),
    ("/risk/scenarios/runs", CallType::Get),
    ("/risk/scenarios/runs/{id}", CallType::Get),
    ("/risk/scenarios/runs/{id}/result", CallType::Get),
];

const PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone)]
pub struct ApiPathMapper {
    env: Environment,
    /// configured → alternate
    aliases: HashMap<&'static str, &'static str>,
    /// alternate → configured; applied to every outgoing path
    env_aliases: HashMap<&'static str, &'static str>,
    unsupported: HashSet<String>,
    path_configs: HashMap<&'static str, CallType>,
}

impl ApiPathMapper {
    pub fn new(env: Environment) -> Self {
        let aliases: HashMap<_, _> = PATH_ALIASES.iter().copied().collect();
        let env_aliases = PATH_ALIASES.iter().map(|(k, v)| (*v, *k)).collect();
        Self {
            env,
            aliases,
            env_aliases,
            // every environment currently supports the full path set
            unsupported: HashSet::new(),
            path_configs: PATH_CONFIGS.iter().copied().collect(),
        }
    }

    pub fn env(&self) -> Environment {
        self.env
    }

    /// Mark a path as unavailable in this environment
    pub fn with_unsupported(mut self, api_path: impl Into<String>) -> Self {
        self.unsupported.insert(api_path.into());
        self
    }

    /// Default verb for `api_path`, which may use either spelling
    pub fn get_call_type(&self, api_path: &str) -> SerenityResult<CallType> {
        self.get_path_config(api_path)
    }

    /// Path to put on the wire for `input_path`
    pub fn get_api_path(&self, input_path: &str) -> SerenityResult<String> {
        self.get_path_config(input_path)?;

        let api_path = self
            .env_aliases
            .get(input_path)
            .copied()
            .unwrap_or(input_path);

        if self.unsupported.contains(api_path) {
            return Err(SerenityError::UnsupportedOperation {
                path: api_path.to_string(),
                env: self.env.to_string(),
            });
        }
        Ok(api_path.to_string())
    }

    fn get_path_config(&self, api_path: &str) -> SerenityResult<CallType> {
        let latest_path = self
            .env_aliases
            .get(api_path)
            .copied()
            .unwrap_or(api_path);

        if let Some(call_type) = self.path_configs.get(latest_path) {
            return Ok(*call_type);
        }

        let template = to_template(latest_path);
        self.path_configs
            .get(template.as_str())
            .copied()
            .ok_or_else(|| SerenityError::UnknownOperation {
                path: latest_path.to_string(),
                env: self.env.to_string(),
            })
    }

    /// Alternate spelling for a configured path, if there is one
    pub fn alias_of(&self, api_path: &str) -> Option<&'static str> {
        self.aliases.get(api_path).copied()
    }
}

/// Replace UUID and integer segments with the placeholder
fn to_template(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty()
                && (Uuid::parse_str(segment).is_ok() || segment.parse::<u64>().is_ok())
            {
                PLACEHOLDER
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
