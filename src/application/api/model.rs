use crate::application::api::core::{SerenityApi, extract};
use crate::domain::errors::SerenityResult;
use crate::domain::types::model::{Model, ModelClass, ModelConfigurationSummary, ModelMetadata};
use crate::infrastructure::serenity::SerenityClient;
use chrono::NaiveDate;
use std::sync::Arc;

/// Model catalog: model classes, models and their configurations
#[derive(Clone)]
pub struct ModelApi {
    api: SerenityApi,
}

impl ModelApi {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            api: SerenityApi::new(client, "catalog"),
        }
    }

    /// Load the full catalog in three calls
    pub async fn load_model_metadata(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<ModelMetadata> {
        let model_classes = self.get_model_classes(as_of_date).await?;
        let models = self.get_models(as_of_date).await?;
        let model_configs = self.get_model_configurations(as_of_date).await?;
        Ok(ModelMetadata::new(model_classes, models, model_configs))
    }

    /// Families of models, e.g. Market Risk or Value at Risk
    pub async fn get_model_classes(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<Vec<ModelClass>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/model/modelclasses", &params).await?;
        extract(&mut resp, "modelClasses")
    }

    pub async fn get_models(&self, as_of_date: Option<NaiveDate>) -> SerenityResult<Vec<Model>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/model/models", &params).await?;
        extract(&mut resp, "models")
    }

    /// Every configured model instance, the inputs risk calculations take
    pub async fn get_model_configurations(
        &self,
        as_of_date: Option<NaiveDate>,
    ) -> SerenityResult<Vec<ModelConfigurationSummary>> {
        let params = SerenityApi::create_std_params(as_of_date);
        let mut resp = self.api.get("/model/modelconfigurations", &params).await?;
        extract(&mut resp, "modelConfigurationSummaries")
    }
}
