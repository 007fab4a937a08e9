use crate::application::api::core::{SerenityApi, extract};
use crate::application::tables::{Cell, Matrix, Table};
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::CallType;
use crate::domain::types::common::{CalculationContext, Portfolio, format_date};
use crate::domain::types::factors::RiskAttributionResult;
use crate::domain::types::refdata::{AssetMaster, NATIVE};
use crate::domain::types::var::{VaRAnalysisResult, VaRBacktestResult};
use crate::infrastructure::serenity::SerenityClient;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_HORIZON_DAYS: i64 = 1;
pub const DEFAULT_LOOKBACK_PERIOD: u32 = 365;
pub const DEFAULT_VAR_QUANTILES: [f64; 3] = [95.0, 97.5, 99.0];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexComponent {
    asset_id: Uuid,
    weight: f64,
}

/// Factor risk attribution, VaR and the factor model's published matrices
#[derive(Clone)]
pub struct RiskApi {
    api: SerenityApi,
}

impl RiskApi {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            api: SerenityApi::new(client, "risk"),
        }
    }

    /// Break portfolio volatility and variance down by asset, sector, sector &
    /// factor and factor. `sector_taxonomy_id` selects the sector pivot,
    /// DACS when absent.
    pub async fn compute_risk_attrib(
        &self,
        ctx: &CalculationContext,
        portfolio: &Portfolio,
        sector_taxonomy_id: Option<Uuid>,
    ) -> SerenityResult<RiskAttributionResult> {
        let model_config_id = ctx
            .model_config_id
            .ok_or_else(|| SerenityError::invalid_input("risk attribution requires a model_config_id"))?;

        let mut body = std_body(ctx.as_of_date);
        body.insert("portfolio".into(), portfolio_json(portfolio));
        body.insert("modelConfigId".into(), json!(model_config_id.to_string()));
        body.insert("assetPositions".into(), json!(portfolio.to_asset_positions()));
        if let Some(taxonomy_id) = sector_taxonomy_id {
            body.insert("sectorTaxonomyId".into(), json!(taxonomy_id.to_string()));
        }

        let raw_json = self
            .api
            .call_api("/market/factor/attribution", &[], Some(Value::Object(body)), Some(CallType::Post))
            .await?;
        RiskAttributionResult::parse(raw_json)
    }

    /// Value at Risk for `portfolio`. `horizon_days` scales the one-day VaR by
    /// its square root; `lookback_period` is the calibration window in days.
    pub async fn compute_var(
        &self,
        ctx: &CalculationContext,
        portfolio: &Portfolio,
        horizon_days: i64,
        lookback_period: u32,
        quantiles: &[f64],
    ) -> SerenityResult<VaRAnalysisResult> {
        if horizon_days <= 0 {
            return Err(SerenityError::invalid_input(format!(
                "horizon_days must be positive: {}",
                horizon_days
            )));
        }
        validate_quantiles(quantiles)?;

        let mut body = std_body(ctx.as_of_date);
        body.insert("portfolio".into(), portfolio_json(portfolio));
        body.insert("markTime".into(), json!(ctx.mark_time.as_str()));
        body.insert("horizonDays".into(), json!(horizon_days));
        body.extend(var_model_params(ctx.model_config_id, lookback_period, quantiles));

        let mut raw_json = self
            .api
            .call_api("/var/compute", &[], Some(Value::Object(body)), Some(CallType::Post))
            .await?;
        let warnings: Vec<String> = raw_json
            .get("warnings")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();
        let result_json = raw_json
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| SerenityError::parse("VaR response is missing result"))?;

        let mut result = VaRAnalysisResult::parse(result_json)?;
        result.warnings = warnings;
        Ok(result)
    }

    /// Run the VaR model daily over `[start_date, end_date]` to find the days
    /// where losses exceeded the forecast
    pub async fn compute_var_backtest(
        &self,
        ctx: &CalculationContext,
        portfolio: &Portfolio,
        start_date: NaiveDate,
        end_date: NaiveDate,
        lookback_period: u32,
        quantiles: &[f64],
    ) -> SerenityResult<VaRBacktestResult> {
        if start_date > end_date {
            return Err(SerenityError::invalid_input(format!(
                "backtest start {} is after end {}",
                start_date, end_date
            )));
        }
        validate_quantiles(quantiles)?;

        let mut body = Map::new();
        body.insert("portfolio".into(), portfolio_json(portfolio));
        body.insert("startDate".into(), json!(format_date(start_date)));
        body.insert("endDate".into(), json!(format_date(end_date)));
        body.insert("markTime".into(), json!(ctx.mark_time.as_str()));
        body.extend(var_model_params(ctx.model_config_id, lookback_period, quantiles));

        let raw_json = self
            .api
            .call_api("/var/backtest", &[], Some(Value::Object(body)), Some(CallType::Post))
            .await?;
        VaRBacktestResult::parse(raw_json)
    }

    /// Asset covariance, labelled by native symbol. With a portfolio, only
    /// its assets are kept.
    pub async fn get_asset_covariance_matrix(
        &self,
        ctx: &CalculationContext,
        asset_master: &AssetMaster,
        portfolio: Option<&Portfolio>,
    ) -> SerenityResult<Matrix> {
        let records = self.get_matrix_records("/market/factor/asset_covariance", ctx).await?;
        let mut matrix = Matrix::pivot(&records, "assetId1", "assetId2", "value")?;
        if let Some(portfolio) = portfolio {
            matrix = matrix.subset(&portfolio_ids(portfolio), true);
        }
        matrix.relabel(|id| native_symbol(asset_master, id))
    }

    /// Per-asset residual (specific) variance: `assetId`, `symbol`, `value`
    pub async fn get_asset_residual_covariance_matrix(
        &self,
        ctx: &CalculationContext,
        asset_master: &AssetMaster,
        portfolio: Option<&Portfolio>,
    ) -> SerenityResult<Table> {
        let records = self.get_matrix_records("/market/factor/residual_covariance", ctx).await?;
        let mut table = Table::new(["assetId"], ["symbol", "value"]);
        for record in &records {
            let asset_id = record
                .get("assetId1")
                .and_then(Value::as_str)
                .ok_or_else(|| SerenityError::parse(format!("record is missing assetId1: {}", record)))?;
            let uuid = parse_asset_id(asset_id)?;
            if portfolio.is_some_and(|p| !p.contains(&uuid)) {
                continue;
            }
            table.push_row(vec![
                Cell::from(asset_id),
                Cell::from(asset_master.get_symbol_by_id(&uuid, NATIVE)?),
                Cell::from(record.get("value").and_then(Value::as_f64)),
            ])?;
        }
        Ok(table)
    }

    pub async fn get_factor_correlation_matrix(&self, ctx: &CalculationContext) -> SerenityResult<Matrix> {
        let records = self.get_matrix_records("/market/factor/correlation", ctx).await?;
        Matrix::pivot(&records, "factor1", "factor2", "value")
    }

    pub async fn get_factor_covariance_matrix(&self, ctx: &CalculationContext) -> SerenityResult<Matrix> {
        let records = self.get_matrix_records("/market/factor/covariance", ctx).await?;
        Matrix::pivot(&records, "factor1", "factor2", "value")
    }

    /// Asset (native symbol) × factor exposures
    pub async fn get_asset_factor_exposures(
        &self,
        ctx: &CalculationContext,
        asset_master: &AssetMaster,
        portfolio: Option<&Portfolio>,
    ) -> SerenityResult<Matrix> {
        let records = self.get_matrix_records("/market/factor/exposures", ctx).await?;
        let mut matrix = Matrix::pivot(&records, "assetId", "factor", "value")?;
        if let Some(portfolio) = portfolio {
            matrix = matrix.subset(&portfolio_ids(portfolio), false);
        }
        matrix.relabel_rows(|id| native_symbol(asset_master, id))
    }

    /// Close date × factor daily returns
    pub async fn get_factor_returns(&self, ctx: &CalculationContext) -> SerenityResult<Matrix> {
        let params = Self::create_get_params(ctx);
        let mut raw_json = self.api.get("/market/factor/returns", &params).await?;
        let records: Vec<Value> = extract(&mut raw_json, "factorReturns")?;
        Matrix::pivot(&records, "closeDate", "factor", "value")
    }

    /// Factor name → the index portfolio that tracks it
    pub async fn get_factor_portfolios(&self, ctx: &CalculationContext) -> SerenityResult<BTreeMap<String, Portfolio>> {
        let params = Self::create_get_params(ctx);
        let mut raw_json = self.api.get("/market/factor/indexcomps", &params).await?;
        let factors: BTreeMap<String, Vec<IndexComponent>> = extract(&mut raw_json, "factors")?;
        Ok(factors
            .into_iter()
            .map(|(factor, comps)| {
                let positions = comps
                    .into_iter()
                    .filter(|c| c.weight != 0.0)
                    .map(|c| (c.asset_id, c.weight));
                (factor, Portfolio::new(positions))
            })
            .collect())
    }

    async fn get_matrix_records(&self, api_path: &str, ctx: &CalculationContext) -> SerenityResult<Vec<Value>> {
        let params = Self::create_get_params(ctx);
        let mut raw_json = self.api.get(api_path, &params).await?;
        extract(&mut raw_json, "matrix")
    }

    /// GET-style parameters for the factor model endpoints
    pub fn create_get_params(ctx: &CalculationContext) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(as_of_date) = ctx.as_of_date {
            params.push(("as_of_date".to_string(), format_date(as_of_date)));
        }
        if let Some(model_config_id) = ctx.model_config_id {
            params.push(("model_config_id".to_string(), model_config_id.to_string()));
        }
        params
    }
}

/// Quantiles must be unique and strictly between 0 and 100
pub fn validate_quantiles(quantiles: &[f64]) -> SerenityResult<()> {
    for (i, q) in quantiles.iter().enumerate() {
        if !(*q > 0.0 && *q < 100.0) {
            return Err(SerenityError::invalid_input(format!("quantile out of range (0, 100): {}", q)));
        }
        if quantiles[..i].contains(q) {
            return Err(SerenityError::invalid_input(format!("duplicate quantile: {}", q)));
        }
    }
    Ok(())
}

fn std_body(as_of_date: Option<NaiveDate>) -> Map<String, Value> {
    SerenityApi::create_std_params(as_of_date)
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}

fn portfolio_json(portfolio: &Portfolio) -> Value {
    json!({"assetPositions": portfolio.to_asset_positions()})
}

fn var_model_params(model_config_id: Option<Uuid>, lookback_period: u32, quantiles: &[f64]) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(id) = model_config_id {
        params.insert("modelConfigId".into(), json!(id.to_string()));
    }
    params.insert("lookbackPeriod".into(), json!(lookback_period));
    params.insert("quantiles".into(), json!(quantiles));
    params
}

fn portfolio_ids(portfolio: &Portfolio) -> HashSet<String> {
    portfolio.get_assets().keys().map(Uuid::to_string).collect()
}

fn parse_asset_id(asset_id: &str) -> SerenityResult<Uuid> {
    Uuid::parse_str(asset_id).map_err(|e| SerenityError::parse(format!("bad asset ID {}: {}", asset_id, e)))
}

fn native_symbol(asset_master: &AssetMaster, asset_id: &str) -> SerenityResult<String> {
    asset_master.get_symbol_by_id(&parse_asset_id(asset_id)?, NATIVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::api::testing::mock_client;
    use crate::domain::types::refdata::AssetSummary;

    fn asset_master(btc: Uuid, eth: Uuid) -> AssetMaster {
        let summaries: Vec<AssetSummary> = serde_json::from_value(json!([
            {"assetId": btc.to_string(), "nativeSymbol": "BTC", "assetSymbol": "tok.btc.bitcoin"},
            {"assetId": eth.to_string(), "nativeSymbol": "ETH", "assetSymbol": "tok.eth.ethereum"}
        ]))
        .unwrap();
        AssetMaster::new(summaries)
    }

    fn ctx() -> CalculationContext {
        CalculationContext::default()
            .with_as_of_date(NaiveDate::from_ymd_opt(2022, 7, 1).unwrap())
            .with_model_config_id(Uuid::nil())
    }

    #[test]
    fn test_validate_quantiles() {
        assert!(validate_quantiles(&DEFAULT_VAR_QUANTILES).is_ok());
        assert!(validate_quantiles(&[95.0, 95.0]).is_err());
        assert!(validate_quantiles(&[0.0]).is_err());
        assert!(validate_quantiles(&[100.0]).is_err());
        assert!(validate_quantiles(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_create_get_params() {
        let params = RiskApi::create_get_params(&ctx());
        assert_eq!(params[0], ("as_of_date".to_string(), "2022-07-01".to_string()));
        assert_eq!(params[1].0, "model_config_id");
        assert!(RiskApi::create_get_params(&CalculationContext::default()).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_var_inputs_never_hit_the_wire() {
        let (client, transport) = mock_client([]);
        let api = RiskApi::new(client);
        let portfolio = Portfolio::default();

        let err = api.compute_var(&ctx(), &portfolio, 0, 365, &DEFAULT_VAR_QUANTILES).await.unwrap_err();
        assert!(matches!(err, SerenityError::InvalidInput(_)));
        let err = api.compute_var(&ctx(), &portfolio, 1, 365, &[99.0, 99.0]).await.unwrap_err();
        assert!(matches!(err, SerenityError::InvalidInput(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_compute_var_body_and_warnings() {
        let btc = Uuid::new_v4();
        let (client, transport) = mock_client([json!({
            "result": {"runDate": "2022-07-01", "baseline": 1000.0, "quantiles": []},
            "warnings": ["missing prices for 1 asset"]
        })]);
        let api = RiskApi::new(client);
        let portfolio = Portfolio::new([(btc, 10.0)]);

        let result = api
            .compute_var(&ctx(), &portfolio, DEFAULT_HORIZON_DAYS, DEFAULT_LOOKBACK_PERIOD, &DEFAULT_VAR_QUANTILES)
            .await
            .unwrap();
        assert_eq!(result.warnings, vec!["missing prices for 1 asset".to_string()]);

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.call_type, CallType::Post);
        assert!(request.url.ends_with("/v1/risk/var/compute"));
        let body = request.body.unwrap();
        assert_eq!(body["asOfDate"], "2022-07-01");
        assert_eq!(body["markTime"], "NY_EOD");
        assert_eq!(body["horizonDays"], 1);
        assert_eq!(body["lookbackPeriod"], 365);
        assert_eq!(body["quantiles"], json!([95.0, 97.5, 99.0]));
        assert_eq!(body["portfolio"]["assetPositions"][0]["assetId"], btc.to_string());
    }

    #[tokio::test]
    async fn test_risk_attrib_requires_model_config() {
        let (client, _transport) = mock_client([]);
        let api = RiskApi::new(client);
        let err = api
            .compute_risk_attrib(&CalculationContext::default(), &Portfolio::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SerenityError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_asset_covariance_subset_and_relabel() {
        let (btc, eth) = (Uuid::new_v4(), Uuid::new_v4());
        let (client, transport) = mock_client([json!({"matrix": [
            {"assetId1": btc.to_string(), "assetId2": btc.to_string(), "value": 0.04},
            {"assetId1": btc.to_string(), "assetId2": eth.to_string(), "value": 0.03},
            {"assetId1": eth.to_string(), "assetId2": btc.to_string(), "value": 0.03},
            {"assetId1": eth.to_string(), "assetId2": eth.to_string(), "value": 0.05}
        ]})]);
        let api = RiskApi::new(client);
        let portfolio = Portfolio::new([(btc, 1.0)]);

        let matrix = api
            .get_asset_covariance_matrix(&ctx(), &asset_master(btc, eth), Some(&portfolio))
            .await
            .unwrap();
        assert_eq!(matrix.shape(), (1, 1));
        assert_eq!(matrix.get("BTC", "BTC"), Some(0.04));

        let request = transport.last_request().await.unwrap();
        assert_eq!(request.call_type, CallType::Get);
        assert!(request.url.ends_with("/v1/risk/market/factor/asset_covariance"));
        assert_eq!(request.query_param("as_of_date"), Some("2022-07-01"));
    }

    #[tokio::test]
    async fn test_residual_covariance_rows() {
        let (btc, eth) = (Uuid::new_v4(), Uuid::new_v4());
        let (client, _transport) = mock_client([json!({"matrix": [
            {"assetId1": btc.to_string(), "assetId2": btc.to_string(), "value": 0.01},
            {"assetId1": eth.to_string(), "assetId2": eth.to_string(), "value": 0.02}
        ]})]);
        let api = RiskApi::new(client);

        let table = api
            .get_asset_residual_covariance_matrix(&ctx(), &asset_master(btc, eth), None)
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "symbol").unwrap().as_str(), Some("ETH"));
    }

    #[tokio::test]
    async fn test_factor_portfolios_drop_zero_weights() {
        let (btc, eth) = (Uuid::new_v4(), Uuid::new_v4());
        let (client, _transport) = mock_client([json!({"factors": {
            "Market": [
                {"assetId": btc.to_string(), "weight": 0.6},
                {"assetId": eth.to_string(), "weight": 0.0}
            ]
        }})]);
        let api = RiskApi::new(client);

        let factors = api.get_factor_portfolios(&ctx()).await.unwrap();
        let market = &factors["Market"];
        assert_eq!(market.len(), 1);
        assert!(market.contains(&btc));
    }

    #[tokio::test]
    async fn test_factor_returns_pivot() {
        let (client, _transport) = mock_client([json!({"factorReturns": [
            {"closeDate": "2022-06-30", "factor": "Market", "value": 0.01},
            {"closeDate": "2022-07-01", "factor": "Market", "value": -0.02}
        ]})]);
        let api = RiskApi::new(client);

        let returns = api.get_factor_returns(&ctx()).await.unwrap();
        assert_eq!(returns.row_labels(), ["2022-06-30", "2022-07-01"]);
        assert_eq!(returns.get("2022-07-01", "Market"), Some(-0.02));
    }
}
