use crate::application::api::core::SerenityApi;
use crate::domain::errors::SerenityResult;
use crate::domain::ports::CallType;
use crate::domain::types::common::{Portfolio, PricingContext};
use crate::domain::types::valuation::ValuationResult;
use crate::infrastructure::serenity::SerenityClient;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Portfolio NAV and related valuation calculations
#[derive(Clone)]
pub struct ValuationApi {
    api: SerenityApi,
}

impl ValuationApi {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            api: SerenityApi::new(client, "valuation"),
        }
    }

    /// NAV at portfolio level and position by position, at close and previous close
    pub async fn compute_portfolio_value(
        &self,
        ctx: &PricingContext,
        portfolio: &Portfolio,
    ) -> SerenityResult<ValuationResult> {
        let positions = json!({"assetPositions": portfolio.to_asset_positions()});

        let mut pricing_context: Map<String, Value> = SerenityApi::create_std_params(ctx.as_of_date)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        pricing_context.insert("portfolio".into(), positions.clone());
        pricing_context.insert("markTime".into(), json!(ctx.mark_time.as_str()));
        if let Some(base_currency_id) = ctx.base_currency_id {
            pricing_context.insert("baseCurrencyId".into(), json!(base_currency_id.to_string()));
        }
        pricing_context.insert("cashTreatment".into(), json!(ctx.cash_treatment.as_str()));

        let request = json!({
            "portfolio": positions,
            "pricing_context": pricing_context,
        });
        let raw_json = self
            .api
            .call_api("/portfolio/compute", &[], Some(request), Some(CallType::Post))
            .await?;
        ValuationResult::parse(raw_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::api::testing::mock_client;
    use crate::domain::types::common::{CashTreatment, MarkTime};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn pv(nav: f64) -> Value {
        json!({"netHoldingsValue": nav, "grossHoldingsValue": nav, "cashPositionValue": 0.0, "netAssetValue": nav})
    }

    #[tokio::test]
    async fn test_compute_portfolio_value() {
        let (btc, usd) = (Uuid::new_v4(), Uuid::new_v4());
        let (client, transport) = mock_client([json!({"close": pv(21000.0), "previous": pv(20000.0)})]);
        let api = ValuationApi::new(client);

        let ctx = PricingContext {
            as_of_date: NaiveDate::from_ymd_opt(2022, 7, 1),
            mark_time: MarkTime::Utc,
            cash_treatment: CashTreatment::FiatPeggedStablecoins,
            base_currency_id: Some(usd),
        };
        let result = api
            .compute_portfolio_value(&ctx, &Portfolio::new([(btc, 1.0)]))
            .await
            .unwrap();
        assert_eq!(result.nav_change(), 1000.0);

        let request = transport.last_request().await.unwrap();
        assert!(request.url.ends_with("/v1/valuation/portfolio/compute"));
        let body = request.body.unwrap();
        assert_eq!(body["portfolio"]["assetPositions"][0]["quantity"], 1.0);
        let pricing_context = &body["pricing_context"];
        assert_eq!(pricing_context["asOfDate"], "2022-07-01");
        assert_eq!(pricing_context["markTime"], "UTC");
        assert_eq!(pricing_context["cashTreatment"], "FIAT_PEGGED_STABLECOINS");
        assert_eq!(pricing_context["baseCurrencyId"], usd.to_string());
    }
}
