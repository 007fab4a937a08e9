//! Typed wrappers over the raw client, one per API group.

pub mod core;
pub mod model;
pub mod pricer;
pub mod provider;
pub mod refdata;
pub mod risk;
pub mod scenarios;
pub mod valuation;

pub use self::core::SerenityApi;
pub use model::ModelApi;
pub use pricer::PricerApi;
pub use provider::SerenityApiProvider;
pub use refdata::RefdataApi;
pub use risk::{DEFAULT_HORIZON_DAYS, DEFAULT_LOOKBACK_PERIOD, DEFAULT_VAR_QUANTILES, RiskApi};
pub use scenarios::ScenariosApi;
pub use valuation::ValuationApi;

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::ConnectionConfig;
    use crate::infrastructure::auth::StaticTokenProvider;
    use crate::infrastructure::mock::MockTransport;
    use crate::infrastructure::serenity::SerenityClient;
    use serde_json::{Value, json};
    use std::sync::Arc;

    pub fn test_config() -> ConnectionConfig {
        let raw = json!({
            "schemaVersion": 2,
            "tenantId": "athansor.cloudwall.network",
            "clientId": "client",
            "userApplicationId": "app",
            "userApplicationSecret": "secret",
            "url": "https://serenity-rest.athansor.dev.cloudwall.network",
            "scope": "https://serenity-api-dev.athansor.cloudwall.network/.default",
            "environment": "DEV"
        });
        ConnectionConfig::from_json(&raw, "test.json").unwrap()
    }

    /// Client over a [`MockTransport`] preloaded with `responses`
    pub fn mock_client(responses: impl IntoIterator<Item = Value>) -> (Arc<SerenityClient>, MockTransport) {
        let transport = MockTransport::with_responses(responses);
        let client = SerenityClient::new(
            test_config(),
            Arc::new(StaticTokenProvider::new("test-token")),
            Arc::new(transport.clone()),
        );
        (Arc::new(client), transport)
    }
}
