use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Date format used by every as-of and run date on the wire
pub const STD_DATE_FMT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(STD_DATE_FMT).to_string()
}

/// Simple value object used as input for risk attribution, VaR and valuation.
///
/// Users normally describe a portfolio in their own symbology and let
/// [`AssetMaster`](crate::domain::types::refdata::AssetMaster) translate it to
/// asset UUIDs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    assets: BTreeMap<Uuid, f64>,
}

/// Wire format of a single position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPosition {
    pub asset_id: String,
    pub quantity: f64,
}

impl Portfolio {
    pub fn new(assets: impl IntoIterator<Item = (Uuid, f64)>) -> Self {
        Self {
            assets: assets.into_iter().collect(),
        }
    }

    /// Underlying map of asset ID to quantity
    pub fn get_assets(&self) -> &BTreeMap<Uuid, f64> {
        &self.assets
    }

    pub fn contains(&self, asset_id: &Uuid) -> bool {
        self.assets.contains_key(asset_id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn to_asset_positions(&self) -> Vec<AssetPosition> {
        self.assets
            .iter()
            .map(|(asset_id, qty)| AssetPosition {
                asset_id: asset_id.to_string(),
                quantity: *qty,
            })
            .collect()
    }
}

/// Snapshot time used for daily close prices; crypto trades 24x7 so the
/// closing time for marking books is a choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkTime {
    #[default]
    #[serde(rename = "NY_EOD")]
    NyEod,
    #[serde(rename = "LN_EOD")]
    LnEod,
    #[serde(rename = "HK_EOD")]
    HkEod,
    #[serde(rename = "UTC")]
    Utc,
}

impl MarkTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkTime::NyEod => "NY_EOD",
            MarkTime::LnEod => "LN_EOD",
            MarkTime::HkEod => "HK_EOD",
            MarkTime::Utc => "UTC",
        }
    }
}

/// Whether the valuator groups USD-pegged stablecoins with fiat as "cash"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashTreatment {
    FiatPeggedStablecoins,
    #[default]
    FiatOnly,
}

impl CashTreatment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashTreatment::FiatPeggedStablecoins => "FIAT_PEGGED_STABLECOINS",
            CashTreatment::FiatOnly => "FIAT_ONLY",
        }
    }
}

/// Common inputs for risk calculations; populate only the overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationContext {
    pub as_of_date: Option<NaiveDate>,
    pub model_config_id: Option<Uuid>,
    pub mark_time: MarkTime,
    pub base_currency_id: Option<Uuid>,
}

impl CalculationContext {
    pub fn with_as_of_date(mut self, as_of_date: NaiveDate) -> Self {
        self.as_of_date = Some(as_of_date);
        self
    }

    pub fn with_model_config_id(mut self, model_config_id: Uuid) -> Self {
        self.model_config_id = Some(model_config_id);
        self
    }

    pub fn with_mark_time(mut self, mark_time: MarkTime) -> Self {
        self.mark_time = mark_time;
        self
    }
}

/// Common inputs for valuation; populate only the overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingContext {
    pub as_of_date: Option<NaiveDate>,
    pub mark_time: MarkTime,
    pub cash_treatment: CashTreatment,
    pub base_currency_id: Option<Uuid>,
}

/// Path in a sector hierarchy, e.g. `Currency/Transparent`. Two paths are the
/// same sector when their `/`-joined forms match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorPath {
    pub sector_levels: Vec<String>,
}

impl SectorPath {
    pub fn new<S: Into<String>>(levels: impl IntoIterator<Item = S>) -> Self {
        Self {
            sector_levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn depth(&self) -> usize {
        self.sector_levels.len()
    }

    pub fn joined(&self) -> String {
        self.sector_levels.join("/")
    }
}

impl PartialEq for SectorPath {
    fn eq(&self, other: &Self) -> bool {
        self.joined() == other.joined()
    }
}

impl Eq for SectorPath {}

impl Hash for SectorPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.joined().hash(state);
    }
}

impl PartialOrd for SectorPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SectorPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.joined().cmp(&other.joined())
    }
}

impl fmt::Display for SectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
