use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::types::common::Portfolio;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Symbology backed by each asset's native blockchain symbol, e.g. BTC
pub const NATIVE: &str = "NATIVE";
/// Symbology backed by the service's own asset symbol, e.g. tok.btc.bitcoin
pub const SERENITY: &str = "SERENITY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAuthority {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrefSymbol {
    pub authority: SymbolAuthority,
    pub symbol: String,
}

/// One record from the asset master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub asset_id: Uuid,
    pub native_symbol: String,
    pub asset_symbol: String,
    #[serde(default)]
    pub xref_symbols: Vec<XrefSymbol>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// In-memory copy of the asset catalog with lookups in both directions
/// between asset IDs and symbols in any supported symbology.
#[derive(Debug, Clone, Default)]
pub struct AssetMaster {
    asset_summaries: Vec<AssetSummary>,
    // asset ID => symbology => symbol
    asset_id_map: HashMap<Uuid, HashMap<String, String>>,
    // symbology => symbol => asset ID
    symbol_map: HashMap<String, HashMap<String, Uuid>>,
}

impl AssetMaster {
    pub fn new(asset_summaries: Vec<AssetSummary>) -> Self {
        let mut asset_id_map: HashMap<Uuid, HashMap<String, String>> = HashMap::new();
        let mut symbol_map: HashMap<String, HashMap<String, Uuid>> = HashMap::new();

        for summary in &asset_summaries {
            let asset_id = summary.asset_id;
            let symbols = asset_id_map.entry(asset_id).or_default();
            symbols.insert(NATIVE.to_string(), summary.native_symbol.clone());
            symbols.insert(SERENITY.to_string(), summary.asset_symbol.clone());

            symbol_map
                .entry(NATIVE.to_string())
                .or_default()
                .insert(summary.native_symbol.clone(), asset_id);
            symbol_map
                .entry(SERENITY.to_string())
                .or_default()
                .insert(summary.asset_symbol.clone(), asset_id);

            for xref in &summary.xref_symbols {
                let authority = xref.authority.name.clone();
                symbols.insert(authority.clone(), xref.symbol.clone());
                symbol_map
                    .entry(authority)
                    .or_default()
                    .insert(xref.symbol.clone(), asset_id);
            }
        }

        Self {
            asset_summaries,
            asset_id_map,
            symbol_map,
        }
    }

    /// Parses raw `assetSummary` JSON records
    pub fn from_json(records: Vec<Value>) -> SerenityResult<Self> {
        let summaries = records
            .into_iter()
            .map(serde_json::from_value::<AssetSummary>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SerenityError::parse(format!("invalid asset summary: {}", e)))?;
        Ok(Self::new(summaries))
    }

    /// Maps positions expressed in `symbology` onto asset IDs.
    ///
    /// Besides the symbol authorities known to the service (e.g. COINGECKO)
    /// two special symbologies are always available: [`NATIVE`] and [`SERENITY`].
    pub fn create_portfolio<I, S>(&self, positions: I, symbology: &str) -> SerenityResult<Portfolio>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let assets = positions
            .into_iter()
            .map(|(symbol, qty)| {
                self.get_asset_id_by_symbol(symbol.as_ref(), symbology)
                    .map(|id| (id, qty))
            })
            .collect::<SerenityResult<Vec<_>>>()?;
        Ok(Portfolio::new(assets))
    }

    pub fn get_symbol_by_id(&self, asset_id: &Uuid, symbology: &str) -> SerenityResult<String> {
        let symbols = self
            .asset_id_map
            .get(asset_id)
            .ok_or_else(|| SerenityError::UnknownAsset {
                asset_id: asset_id.to_string(),
            })?;

        symbols
            .get(symbology)
            .cloned()
            .ok_or_else(|| SerenityError::UnknownSymbology {
                symbology: symbology.to_string(),
                subject: format!("asset_id: {}", asset_id),
            })
    }

    pub fn get_asset_id_by_symbol(&self, symbol: &str, symbology: &str) -> SerenityResult<Uuid> {
        let symbols =
            self.symbol_map
                .get(symbology)
                .ok_or_else(|| SerenityError::UnknownSymbology {
                    symbology: symbology.to_string(),
                    subject: format!("symbol: {}", symbol),
                })?;

        symbols
            .get(symbol)
            .copied()
            .ok_or_else(|| SerenityError::UnknownSymbol {
                symbol: symbol.to_string(),
                symbology: symbology.to_string(),
            })
    }

    /// All symbologies with at least one mapped symbol
    pub fn symbologies(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.symbol_map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn get_asset_summaries(&self) -> &[AssetSummary] {
        &self.asset_summaries
    }

    pub fn len(&self) -> usize {
        self.asset_id_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asset_id_map.is_empty()
    }
}
