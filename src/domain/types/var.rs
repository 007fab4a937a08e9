use crate::domain::errors::{SerenityError, SerenityResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single VaR quantile, e.g. 99th percentile VaR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaRQuantile {
    /// Portion of the return distribution considered, e.g. 99
    pub quantile: f64,
    /// Forecast loss for the quantile in base currency
    pub var_absolute: f64,
    /// `var_absolute` over the portfolio value, as a percentage
    pub var_relative: f64,
}

/// A day when portfolio losses exceeded the prior day's forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaRBreach {
    pub breach_date: NaiveDate,
    pub portfolio_loss_absolute: f64,
    pub portfolio_loss_relative: f64,
    /// Quantiles whose estimate was breached on this date
    pub quantiles: Vec<VaRQuantile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaRAnalysisResult {
    pub run_date: NaiveDate,
    /// Previous day's portfolio value at the mark time
    pub baseline: f64,
    pub quantiles: Vec<VaRQuantile>,
    /// Assets left out of the calculation, e.g. for lack of data
    #[serde(rename = "excludedAssetIds", default)]
    pub excluded_assets: Vec<Uuid>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl VaRAnalysisResult {
    pub fn parse(raw_json: Value) -> SerenityResult<Self> {
        serde_json::from_value(raw_json).map_err(|e| SerenityError::parse(format!("VaR result: {}", e)))
    }

    pub fn quantile(&self, quantile: f64) -> Option<&VaRQuantile> {
        self.quantiles
            .iter()
            .find(|q| (q.quantile - quantile).abs() < 1e-9)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaRBacktestResult {
    pub results: Vec<VaRAnalysisResult>,
    #[serde(default)]
    pub breaches: Vec<VaRBreach>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl VaRBacktestResult {
    pub fn parse(raw_json: Value) -> SerenityResult<Self> {
        serde_json::from_value(raw_json)
            .map_err(|e| SerenityError::parse(format!("VaR backtest result: {}", e)))
    }
}
