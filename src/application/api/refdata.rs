use crate::application::api::core::{SerenityApi, extract};
use crate::domain::errors::SerenityResult;
use crate::domain::types::refdata::AssetMaster;
use crate::infrastructure::serenity::SerenityClient;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
struct NamedDescription {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectorTaxonomy {
    name: String,
    taxonomy_id: Uuid,
}

/// The Serenity asset master and the reference data needed to build
/// portfolios and run risk models
#[derive(Clone)]
pub struct RefdataApi {
    api: SerenityApi,
}

impl RefdataApi {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            api: SerenityApi::new(client, "refdata"),
        }
    }

    /// Load the whole asset master into memory, as of `as_of_date` or latest
    pub async fn load_asset_master(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<AssetMaster> {
        let asset_summaries = self.get_asset_summaries(as_of_date).await?;
        let asset_master = AssetMaster::from_json(asset_summaries)?;
        info!("Loaded asset master: {} assets", asset_master.len());
        Ok(asset_master)
    }

    /// Raw asset records; prefer [`RefdataApi::load_asset_master`]
    pub async fn get_asset_summaries(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<Vec<Value>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/asset/summaries", &params).await?;
        extract(&mut resp, "assetSummary")
    }

    /// Supported asset types, e.g. TOKEN, name → description
    pub async fn get_asset_types(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<BTreeMap<String, String>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/asset/types", &params).await?;
        let asset_types: Vec<NamedDescription> = extract(&mut resp, "assetType")?;
        Ok(asset_types.into_iter().map(|t| (t.name, t.description)).collect())
    }

    /// Supported symbol authorities, e.g. KAIKO or COINGECKO, name → description
    pub async fn get_symbol_authorities(
        &self,
        as_of_date: Option<NaiveDate>,
    ) -> SerenityResult<BTreeMap<String, String>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/symbol/authorities", &params).await?;
        let authorities: Vec<NamedDescription> = extract(&mut resp, "symbolAuthority")?;
        Ok(authorities.into_iter().map(|a| (a.name, a.description)).collect())
    }

    /// Short key like DACS or DATS → sector taxonomy ID
    pub async fn get_sector_taxonomies(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<BTreeMap<String, Uuid>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/sector/taxonomies", &params).await?;
        let taxonomies: Vec<SectorTaxonomy> = extract(&mut resp, "sectorTaxonomy")?;
        Ok(taxonomies.into_iter().map(|t| (t.name, t.taxonomy_id)).collect())
    }
}
