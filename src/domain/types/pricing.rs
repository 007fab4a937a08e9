//! Records exchanged with the derivatives pricing endpoints.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// +1 for calls, -1 for puts, as used by the Black formulas
    pub fn kind(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionStyle {
    European,
    American,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrikeType {
    Absolute,
    LogMoneyness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedUnderlier {
    pub asset_id: Uuid,
    pub native_symbol: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionExpiry {
    pub expiration_date: NaiveDate,
    pub expiration_time: NaiveTime,
}

impl OptionExpiry {
    pub fn expiry_datetime(&self) -> DateTime<Utc> {
        self.expiration_date.and_time(self.expiration_time).and_utc()
    }
}

/// A listed option contract as published by the reference data service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedOption {
    pub asset_id: Uuid,
    #[serde(default)]
    pub asset_type: Option<String>,
    pub native_symbol: String,
    pub underlier_asset_id: Uuid,
    #[serde(default)]
    pub contract_size: f64,
    pub option_type: OptionType,
    pub option_style: OptionStyle,
    pub strike_price: f64,
    pub expiry: OptionExpiry,
}

/// One option to value, either a listed contract or an OTC description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValuation {
    pub option_valuation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_asset_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlier_asset_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_type: Option<OptionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_style: Option<OptionStyle>,
    #[serde(default = "default_qty")]
    pub qty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_vol_override: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_price_override: Option<f64>,
}

fn default_qty() -> f64 {
    1.0
}

impl OptionValuation {
    pub fn listed(option_valuation_id: impl Into<String>, option_asset_id: Uuid) -> Self {
        Self {
            option_valuation_id: option_valuation_id.into(),
            option_asset_id: Some(option_asset_id),
            underlier_asset_id: None,
            strike: None,
            expiry: None,
            option_type: None,
            option_style: None,
            qty: default_qty(),
            implied_vol_override: None,
            spot_price_override: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValuationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_config_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_curve_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vol_surface_id: Option<Uuid>,
    pub options: Vec<OptionValuation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValuationResult {
    pub option_valuation_id: String,
    pub pv: f64,
    #[serde(default)]
    pub iv: Option<f64>,
    #[serde(default)]
    pub spot_price: Option<f64>,
    #[serde(default)]
    pub forward_price: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub rho: Option<f64>,
}

// ===== Yield curves =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldCurveDefinition {
    pub yield_curve_id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub underlier_asset_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSourcePoint {
    pub duration: f64,
    pub rate: f64,
    pub discount_factor: f64,
    /// (spot, future) mark prices the point was implied from
    #[serde(default)]
    pub mark_prices: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawYieldCurve {
    pub points: Vec<RateSourcePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolatedYieldCurve {
    pub definition: YieldCurveDefinition,
    pub durations: Vec<f64>,
    pub rates: Vec<f64>,
    pub discount_factors: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldCurveVersion {
    pub raw: RawYieldCurve,
    pub interpolated: InterpolatedYieldCurve,
    pub as_of_time: DateTime<Utc>,
}

/// A curve definition plus the times at which versions exist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldCurveAvailability {
    pub definition: YieldCurveDefinition,
    #[serde(default)]
    pub as_of_times: Vec<DateTime<Utc>>,
}

// ===== Volatility surfaces =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilitySurfaceDefinition {
    pub vol_surface_id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub underlier_asset_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolPoint {
    pub time_to_expiry: f64,
    pub strike_value: f64,
    pub iv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVolatilitySurface {
    pub strike_type: StrikeType,
    pub spot_price: f64,
    pub vol_points: Vec<VolPoint>,
}

/// Raw SVI parameters for a single expiry slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SviParams {
    pub a: f64,
    pub b: f64,
    pub rho: f64,
    pub m: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolatedVolatilitySurface {
    pub definition: VolatilitySurfaceDefinition,
    pub time_to_expiries: Vec<f64>,
    pub strikes: Vec<f64>,
    pub vols: Vec<f64>,
    /// Keyed by the time to expiry as published, e.g. "0.0833"
    #[serde(default)]
    pub calibration_params: BTreeMap<String, SviParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilitySurfaceVersion {
    pub raw: RawVolatilitySurface,
    pub interpolated: InterpolatedVolatilitySurface,
    pub as_of_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilitySurfaceAvailability {
    pub definition: VolatilitySurfaceDefinition,
    #[serde(default)]
    pub as_of_times: Vec<DateTime<Utc>>,
}

impl VolatilitySurfaceVersion {
    /// Distinct expiries present in the raw points, ascending
    pub fn raw_expiries(&self) -> Vec<f64> {
        let mut expiries: Vec<f64> = self.raw.vol_points.iter().map(|p| p.time_to_expiry).collect();
        expiries.sort_by(f64::total_cmp);
        expiries.dedup();
        expiries
    }

    /// SVI parameters for the calibrated slice closest to `time_to_expiry`
    pub fn calibration_for(&self, time_to_expiry: f64) -> Option<SviParams> {
        self.interpolated
            .calibration_params
            .iter()
            .filter_map(|(k, v)| k.parse::<f64>().ok().map(|t| (t, *v)))
            .min_by(|(a, _), (b, _)| {
                (a - time_to_expiry).abs().total_cmp(&(b - time_to_expiry).abs())
            })
            .map(|(_, params)| params)
    }
}
