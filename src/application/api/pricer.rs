use crate::application::api::core::{SerenityApi, extract};
use crate::domain::errors::SerenityResult;
use crate::domain::ports::CallType;
use crate::domain::types::pricing::{
    ListedOption, OptionValuationRequest, OptionValuationResult, SupportedUnderlier, VolatilitySurfaceAvailability,
    VolatilitySurfaceDefinition, VolatilitySurfaceVersion, YieldCurveAvailability, YieldCurveDefinition,
    YieldCurveVersion,
};
use crate::infrastructure::serenity::SerenityClient;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// Derivatives pricing: option valuation plus the yield curves and
/// volatility surfaces that feed it.
///
/// Every endpoint in this group wraps its payload in a `result` envelope.
#[derive(Clone)]
pub struct PricerApi {
    api: SerenityApi,
}

fn as_of_time_params(as_of_time: Option<DateTime<Utc>>) -> Vec<(String, String)> {
    as_of_time
        .map(|t| vec![("as_of_time".to_string(), t.to_rfc3339_opts(SecondsFormat::Secs, true))])
        .unwrap_or_default()
}

impl PricerApi {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            api: SerenityApi::new(client, "pricing"),
        }
    }

    async fn get_result<T: DeserializeOwned>(&self, api_path: &str, params: &[(String, String)]) -> SerenityResult<T> {
        let mut resp = self.api.get(api_path, params).await?;
        extract(&mut resp, "result")
    }

    /// Value a batch of listed or OTC options in one call
    pub async fn compute_option_valuations(
        &self,
        request: &OptionValuationRequest,
    ) -> SerenityResult<Vec<OptionValuationResult>> {
        let body = serde_json::to_value(request)?;
        let mut resp = self
            .api
            .call_api("/derivatives/options/valuation", &[], Some(body), Some(CallType::Post))
            .await?;
        extract(&mut resp, "result")
    }

    /// Underliers with listed options the pricer supports
    pub async fn get_supported_underliers(
        &self,
        as_of_date: Option<NaiveDate>,
    ) -> SerenityResult<Vec<SupportedUnderlier>> {
        let params = SerenityApi::create_std_params(as_of_date);
        self.get_result("/derivatives/options/underliers", &params).await
    }

    /// Listed option contracts, optionally for a single underlier
    pub async fn get_supported_options(
        &self,
        underlier_asset_id: Option<Uuid>,
        as_of_date: Option<NaiveDate>,
    ) -> SerenityResult<Vec<ListedOption>> {
        let mut params = SerenityApi::create_std_params(as_of_date);
        if let Some(id) = underlier_asset_id {
            params.push(("underlier_asset_id".to_string(), id.to_string()));
        }
        self.get_result("/derivatives/options/listed", &params).await
    }

    pub async fn get_yield_curve_definitions(
        &self,
        as_of_time: Option<DateTime<Utc>>,
    ) -> SerenityResult<Vec<YieldCurveDefinition>> {
        self.get_result("/curves/rates/definitions", &as_of_time_params(as_of_time))
            .await
    }

    /// Raw and interpolated curve, latest version when `as_of_time` is absent
    pub async fn get_yield_curve_version(
        &self,
        yield_curve_id: Uuid,
        as_of_time: Option<DateTime<Utc>>,
    ) -> SerenityResult<YieldCurveVersion> {
        let path = format!("/curves/rates/{}", yield_curve_id);
        self.get_result(&path, &as_of_time_params(as_of_time)).await
    }

    /// Times at which versions of the curve were published
    pub async fn get_yield_curve_availability(&self, yield_curve_id: Uuid) -> SerenityResult<YieldCurveAvailability> {
        let path = format!("/curves/rates/{}/versions", yield_curve_id);
        self.get_result(&path, &[]).await
    }

    pub async fn get_volatility_surface_definitions(
        &self,
        as_of_time: Option<DateTime<Utc>>,
    ) -> SerenityResult<Vec<VolatilitySurfaceDefinition>> {
        self.get_result("/volsurfaces/definitions", &as_of_time_params(as_of_time))
            .await
    }

    /// Raw vol points plus the interpolated surface and its SVI calibration
    pub async fn get_volatility_surface_version(
        &self,
        vol_surface_id: Uuid,
        as_of_time: Option<DateTime<Utc>>,
    ) -> SerenityResult<VolatilitySurfaceVersion> {
        let path = format!("/volsurfaces/{}", vol_surface_id);
        self.get_result(&path, &as_of_time_params(as_of_time)).await
    }

    pub async fn get_volatility_surface_availability(
        &self,
        vol_surface_id: Uuid,
    ) -> SerenityResult<VolatilitySurfaceAvailability> {
        let path = format!("/volsurfaces/{}/versions", vol_surface_id);
        self.get_result(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::api::testing::mock_client;
    use crate::domain::types::pricing::OptionValuation;
    use chrono::TimeZone;
    use serde_json::json;

    #[tokio::test]
    async fn test_compute_option_valuations() {
        let option_id = Uuid::new_v4();
        let (client, transport) = mock_client([json!({"result": [
            {"optionValuationId": "opt-1", "pv": 1523.5, "iv": 0.65, "delta": 0.52}
        ]})]);
        let api = PricerApi::new(client);

        let request = OptionValuationRequest {
            options: vec![OptionValuation::listed("opt-1", option_id)],
            ..Default::default()
        };
        let results = api.compute_option_valuations(&request).await.unwrap();
        assert_eq!(results[0].pv, 1523.5);
        assert_eq!(results[0].delta, Some(0.52));

        let sent = transport.last_request().await.unwrap();
        assert_eq!(sent.call_type, CallType::Post);
        assert!(sent.url.ends_with("/v1/pricing/derivatives/options/valuation"));
        assert_eq!(sent.body.unwrap()["options"][0]["optionAssetId"], option_id.to_string());
    }

    #[tokio::test]
    async fn test_parameterised_paths() {
        let curve_id = Uuid::new_v4();
        let as_of_time = Utc.with_ymd_and_hms(2022, 7, 1, 16, 0, 0).unwrap();
        let (client, transport) = mock_client([json!({"result": {
            "definition": {"yieldCurveId": curve_id.to_string(), "displayName": "BTC"},
            "asOfTimes": ["2022-07-01T16:00:00Z"]
        }})]);
        let api = PricerApi::new(client);

        let availability = api.get_yield_curve_availability(curve_id).await.unwrap();
        assert_eq!(availability.as_of_times, vec![as_of_time]);
        let sent = transport.last_request().await.unwrap();
        assert!(sent.url.ends_with(&format!("/v1/pricing/curves/rates/{}/versions", curve_id)));
        assert_eq!(sent.call_type, CallType::Get);
    }

    #[test]
    fn test_as_of_time_params() {
        let t = Utc.with_ymd_and_hms(2022, 7, 1, 16, 0, 0).unwrap();
        assert_eq!(as_of_time_params(Some(t))[0].1, "2022-07-01T16:00:00Z");
        assert!(as_of_time_params(None).is_empty());
    }
}
