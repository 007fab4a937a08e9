use crate::application::api::model::ModelApi;
use crate::application::api::pricer::PricerApi;
use crate::application::api::refdata::RefdataApi;
use crate::application::api::risk::RiskApi;
use crate::application::api::scenarios::ScenariosApi;
use crate::application::api::valuation::ValuationApi;
use crate::config::{ConnectionConfig, SdkEnvConfig};
use crate::infrastructure::serenity::SerenityClient;
use std::sync::Arc;

/// Single entry point to every typed Serenity API, sharing one client
#[derive(Clone)]
pub struct SerenityApiProvider {
    client: Arc<SerenityClient>,
    refdata_api: RefdataApi,
    risk_api: RiskApi,
    valuation_api: ValuationApi,
    pricer_api: PricerApi,
    model_api: ModelApi,
    scenarios_api: ScenariosApi,
}

impl SerenityApiProvider {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            refdata_api: RefdataApi::new(client.clone()),
            risk_api: RiskApi::new(client.clone()),
            valuation_api: ValuationApi::new(client.clone()),
            pricer_api: PricerApi::new(client.clone()),
            model_api: ModelApi::new(client.clone()),
            scenarios_api: ScenariosApi::new(client.clone()),
            client,
        }
    }

    /// Connect over HTTP with client-credentials OAuth
    pub fn connect(config: ConnectionConfig, env_config: &SdkEnvConfig) -> Self {
        Self::new(Arc::new(SerenityClient::connect(config, env_config)))
    }

    /// The raw client, for endpoints without a typed wrapper
    pub fn client(&self) -> &Arc<SerenityClient> {
        &self.client
    }

    pub fn refdata(&self) -> &RefdataApi {
        &self.refdata_api
    }

    /// Factor risk attribution and VaR
    pub fn risk(&self) -> &RiskApi {
        &self.risk_api
    }

    pub fn valuation(&self) -> &ValuationApi {
        &self.valuation_api
    }

    pub fn pricer(&self) -> &PricerApi {
        &self.pricer_api
    }

    pub fn model(&self) -> &ModelApi {
        &self.model_api
    }

    pub fn scenarios(&self) -> &ScenariosApi {
        &self.scenarios_api
    }
}
