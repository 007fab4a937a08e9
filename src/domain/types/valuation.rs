use crate::domain::errors::{SerenityError, SerenityResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValue {
    pub net_holdings_value: f64,
    pub gross_holdings_value: f64,
    pub cash_position_value: f64,
    pub net_asset_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionValue {
    pub value: f64,
    pub price: f64,
    #[serde(rename = "qty")]
    pub quantity: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionValues {
    pub close: PositionValue,
    pub previous: PositionValue,
}

/// Portfolio NAV plus position-by-position values, at close and previous close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub close: PortfolioValue,
    pub previous: PortfolioValue,
    #[serde(default)]
    pub positions: HashMap<Uuid, PositionValues>,
}

impl ValuationResult {
    pub fn parse(raw_json: Value) -> SerenityResult<Self> {
        serde_json::from_value(raw_json)
            .map_err(|e| SerenityError::parse(format!("valuation result: {}", e)))
    }

    /// Day-over-day change in net asset value
    pub fn nav_change(&self) -> f64 {
        self.close.net_asset_value - self.previous.net_asset_value
    }
}
