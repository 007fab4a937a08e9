use crate::domain::errors::{SerenityError, SerenityResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelClass {
    pub short_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub short_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfigurationSummary {
    pub model_config_id: Uuid,
    pub short_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the model catalog knows, loaded once.
///
/// The most useful call is [`ModelMetadata::get_model_configuration_id`],
/// which resolves the model configuration ID risk calculations take as input.
#[derive(Debug, Clone, Default)]
pub struct ModelMetadata {
    model_classes: Vec<ModelClass>,
    models: Vec<Model>,
    model_configs: Vec<ModelConfigurationSummary>,
    model_config_map: HashMap<String, Uuid>,
}

impl ModelMetadata {
    pub fn new(
        model_classes: Vec<ModelClass>,
        models: Vec<Model>,
        model_configs: Vec<ModelConfigurationSummary>,
    ) -> Self {
        let model_config_map = model_configs
            .iter()
            .map(|config| (config.short_name.clone(), config.model_config_id))
            .collect();
        Self {
            model_classes,
            models,
            model_configs,
            model_config_map,
        }
    }

    /// Display names of model classes like Market Risk or Value at Risk,
    /// falling back to the short name when no display name is published
    pub fn get_model_class_names(&self) -> Vec<String> {
        self.model_classes
            .iter()
            .map(|c| c.display_name.clone().unwrap_or_else(|| c.short_name.clone()))
            .collect()
    }

    pub fn get_model_names(&self) -> Vec<String> {
        self.models
            .iter()
            .map(|m| m.display_name.clone().unwrap_or_else(|| m.short_name.clone()))
            .collect()
    }

    /// Short name to display name for every model configuration
    pub fn get_model_configurations(&self) -> BTreeMap<String, Option<String>> {
        self.model_configs
            .iter()
            .map(|c| (c.short_name.clone(), c.display_name.clone()))
            .collect()
    }

    pub fn get_model_configuration_names(&self) -> Vec<String> {
        self.get_model_configurations().into_keys().collect()
    }

    pub fn get_model_configuration_id(&self, short_name: &str) -> SerenityResult<Uuid> {
        self.model_config_map
            .get(short_name)
            .copied()
            .ok_or_else(|| SerenityError::UnknownModelConfiguration {
                short_name: short_name.to_string(),
            })
    }

    pub fn model_configuration_summaries(&self) -> &[ModelConfigurationSummary] {
        &self.model_configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> (ModelMetadata, Uuid) {
        let config_id = Uuid::new_v4();
        let classes: Vec<ModelClass> = serde_json::from_value(json!([
            {"shortName": "risk.factor", "displayName": "Factor Risk"},
            {"shortName": "risk.var"}
        ]))
        .unwrap();
        let models: Vec<Model> = serde_json::from_value(json!([
            {"shortName": "risk.factor.regression", "displayName": "Regression Factor Model"}
        ]))
        .unwrap();
        let configs: Vec<ModelConfigurationSummary> = serde_json::from_value(json!([
            {"modelConfigId": config_id.to_string(), "shortName": "risk.factor.regression.SLM.MT", "displayName": "Medium Term"},
            {"modelConfigId": Uuid::new_v4().to_string(), "shortName": "risk.var.historical"}
        ]))
        .unwrap();
        (ModelMetadata::new(classes, models, configs), config_id)
    }

    #[test]
    fn test_display_name_fallback() {
        let (meta, _) = metadata();
        assert_eq!(meta.get_model_class_names(), vec!["Factor Risk", "risk.var"]);
        assert_eq!(meta.get_model_names(), vec!["Regression Factor Model"]);
    }

    #[test]
    fn test_model_configuration_lookup() {
        let (meta, config_id) = metadata();
        assert_eq!(
            meta.get_model_configuration_id("risk.factor.regression.SLM.MT").unwrap(),
            config_id
        );
        assert!(matches!(
            meta.get_model_configuration_id("nope"),
            Err(SerenityError::UnknownModelConfiguration { .. })
        ));

        let configs = meta.get_model_configurations();
        assert_eq!(configs["risk.var.historical"], None);
        assert_eq!(
            meta.get_model_configuration_names(),
            vec!["risk.factor.regression.SLM.MT", "risk.var.historical"]
        );
    }
}
