//! Typed view over the factor risk attribution output.
//!
//! The service has shipped two layouts for sector factor exposures; both are
//! accepted and normalised into [`SectorFactorExposure`] records.

use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::types::common::SectorPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub factor_risk: f64,
    pub specific_risk: f64,
    pub total_risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorExposureValue {
    pub factor_exposure: f64,
    #[serde(default)]
    pub factor_exposure_base_ccy: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorFactorExposure {
    pub factor: String,
    pub sector_path: SectorPath,
    pub absolute_risk: Option<f64>,
    pub relative_risk: Option<f64>,
    pub marginal_risk: Option<f64>,
    pub factor_exposure: FactorExposureValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalFactorRisk {
    pub factor: String,
    pub absolute_risk_contribution: f64,
    pub relative_risk_contribution: f64,
    pub marginal_risk_contribution: f64,
    pub factor_exposure: FactorExposureValue,
}

// ===== Wire formats =====

#[derive(Debug, Deserialize)]
struct TotalRiskJson {
    volatility: Risk,
    variance: Risk,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FactorExposureJson {
    Nested(FactorExposureValue),
    Flat(f64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FactorRiskJson {
    factor: String,
    absolute_contribution: f64,
    relative_contribution: f64,
    marginal_contribution: f64,
    factor_exposure: FactorExposureJson,
    #[serde(default)]
    factor_exposure_base_ccy: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetRiskJson {
    asset_id: Uuid,
    #[serde(flatten)]
    risk: Risk,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectorRiskJson {
    sector_levels: Vec<String>,
    #[serde(flatten)]
    risk: Risk,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionJson {
    by_asset: Vec<AssetRiskJson>,
    #[serde(default)]
    by_sector: Vec<SectorRiskJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectorFactorExposureJson {
    factor: String,
    sector_levels: Vec<String>,
    absolute_risk: f64,
    relative_risk: f64,
    marginal_risk: f64,
    factor_exposure: FactorExposureValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFactorExposureJson {
    factor: String,
    #[serde(flatten)]
    exposure: FactorExposureValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySectorExposureJson {
    sector_levels: Vec<String>,
    factor_exposure: Vec<LegacyFactorExposureJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RiskAttributionJson {
    total_risk: TotalRiskJson,
    factor_risk: Vec<FactorRiskJson>,
    asset_marginal_risk: Vec<AssetRiskJson>,
    absolute_contribution_risk: ContributionJson,
    relative_contribution_risk: ContributionJson,
    #[serde(default)]
    sector_factor_exposures: Vec<SectorFactorExposureJson>,
    #[serde(default)]
    sector_factor_exposure: Vec<LegacySectorExposureJson>,
}

/// Result class for risk attribution, breaking the portfolio risk down by
/// asset, sector, factor and sector & factor.
#[derive(Debug, Clone)]
pub struct RiskAttributionResult {
    raw_json: Value,
    portfolio_volatility: Risk,
    portfolio_variance: Risk,
    portfolio_risk_by_factor: Vec<TotalFactorRisk>,
    absolute_risk_by_asset: HashMap<Uuid, Risk>,
    relative_risk_by_asset: HashMap<Uuid, Risk>,
    marginal_risk_by_asset: HashMap<Uuid, Risk>,
    absolute_risk_by_sector: BTreeMap<SectorPath, Risk>,
    relative_risk_by_sector: BTreeMap<SectorPath, Risk>,
    sector_factor_exposures: Vec<(SectorPath, Vec<SectorFactorExposure>)>,
}

impl RiskAttributionResult {
    pub fn parse(raw_json: Value) -> SerenityResult<Self> {
        let parsed: RiskAttributionJson = serde_json::from_value(raw_json.clone())
            .map_err(|e| SerenityError::parse(format!("risk attribution: {}", e)))?;

        let portfolio_risk_by_factor = parsed
            .factor_risk
            .into_iter()
            .map(|obj| {
                let factor_exposure = match obj.factor_exposure {
                    FactorExposureJson::Nested(value) => value,
                    FactorExposureJson::Flat(exposure) => FactorExposureValue {
                        factor_exposure: exposure,
                        factor_exposure_base_ccy: obj.factor_exposure_base_ccy,
                    },
                };
                TotalFactorRisk {
                    factor: obj.factor,
                    absolute_risk_contribution: obj.absolute_contribution,
                    relative_risk_contribution: obj.relative_contribution,
                    marginal_risk_contribution: obj.marginal_contribution,
                    factor_exposure,
                }
            })
            .collect();

        let marginal_risk_by_asset = by_asset(parsed.asset_marginal_risk);
        let (absolute_risk_by_asset, absolute_risk_by_sector) =
            split_contribution(parsed.absolute_contribution_risk);
        let (relative_risk_by_asset, relative_risk_by_sector) =
            split_contribution(parsed.relative_contribution_risk);

        let exposures: Vec<SectorFactorExposure> = if !parsed.sector_factor_exposures.is_empty() {
            parsed
                .sector_factor_exposures
                .into_iter()
                .map(|obj| SectorFactorExposure {
                    factor: obj.factor,
                    sector_path: SectorPath::new(obj.sector_levels),
                    absolute_risk: Some(obj.absolute_risk),
                    relative_risk: Some(obj.relative_risk),
                    marginal_risk: Some(obj.marginal_risk),
                    factor_exposure: obj.factor_exposure,
                })
                .collect()
        } else {
            parsed
                .sector_factor_exposure
                .into_iter()
                .flat_map(|sector| {
                    let path = SectorPath::new(sector.sector_levels);
                    sector
                        .factor_exposure
                        .into_iter()
                        .map(move |fe| SectorFactorExposure {
                            factor: fe.factor,
                            sector_path: path.clone(),
                            absolute_risk: None,
                            relative_risk: None,
                            marginal_risk: None,
                            factor_exposure: fe.exposure,
                        })
                })
                .collect()
        };

        let mut sector_factor_exposures: Vec<(SectorPath, Vec<SectorFactorExposure>)> = Vec::new();
        for exposure in exposures {
            match sector_factor_exposures
                .iter_mut()
                .find(|(path, _)| *path == exposure.sector_path)
            {
                Some((_, group)) => group.push(exposure),
                None => sector_factor_exposures.push((exposure.sector_path.clone(), vec![exposure])),
            }
        }

        Ok(Self {
            raw_json,
            portfolio_volatility: parsed.total_risk.volatility,
            portfolio_variance: parsed.total_risk.variance,
            portfolio_risk_by_factor,
            absolute_risk_by_asset,
            relative_risk_by_asset,
            marginal_risk_by_asset,
            absolute_risk_by_sector,
            relative_risk_by_sector,
            sector_factor_exposures,
        })
    }

    /// Top-level risk expressed in volatility
    pub fn get_portfolio_volatility(&self) -> &Risk {
        &self.portfolio_volatility
    }

    /// Top-level risk expressed in variance
    pub fn get_portfolio_variance(&self) -> &Risk {
        &self.portfolio_variance
    }

    /// Per-factor contributions, in the order the service lists factors
    pub fn get_portfolio_risk_by_factor(&self) -> &[TotalFactorRisk] {
        &self.portfolio_risk_by_factor
    }

    pub fn get_factor_risk(&self, factor: &str) -> Option<&TotalFactorRisk> {
        self.portfolio_risk_by_factor.iter().find(|r| r.factor == factor)
    }

    pub fn get_absolute_risk_by_asset(&self) -> &HashMap<Uuid, Risk> {
        &self.absolute_risk_by_asset
    }

    pub fn get_relative_risk_by_asset(&self) -> &HashMap<Uuid, Risk> {
        &self.relative_risk_by_asset
    }

    pub fn get_marginal_risk_by_asset(&self) -> &HashMap<Uuid, Risk> {
        &self.marginal_risk_by_asset
    }

    /// Every prefix of the sector tree is present, so risk can be read at any level
    pub fn get_absolute_risk_by_sector(&self) -> &BTreeMap<SectorPath, Risk> {
        &self.absolute_risk_by_sector
    }

    pub fn get_relative_risk_by_sector(&self) -> &BTreeMap<SectorPath, Risk> {
        &self.relative_risk_by_sector
    }

    /// Exposures grouped by sector, sectors in first-seen order
    pub fn get_sector_factor_exposures(&self) -> &[(SectorPath, Vec<SectorFactorExposure>)] {
        &self.sector_factor_exposures
    }

    pub fn get_sector_factor_exposure(&self, sector: &SectorPath) -> Option<&[SectorFactorExposure]> {
        self.sector_factor_exposures
            .iter()
            .find(|(path, _)| path == sector)
            .map(|(_, group)| group.as_slice())
    }

    pub fn get_raw_output(&self) -> &Value {
        &self.raw_json
    }
}

fn by_asset(rows: Vec<AssetRiskJson>) -> HashMap<Uuid, Risk> {
    rows.into_iter().map(|row| (row.asset_id, row.risk)).collect()
}

fn split_contribution(
    contrib: ContributionJson,
) -> (HashMap<Uuid, Risk>, BTreeMap<SectorPath, Risk>) {
    let by_sector = contrib
        .by_sector
        .into_iter()
        .map(|row| (SectorPath::new(row.sector_levels), row.risk))
        .collect();
    (by_asset(contrib.by_asset), by_sector)
}
