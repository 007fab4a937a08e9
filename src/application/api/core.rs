use crate::config::Environment;
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::CallType;
use crate::domain::types::common::format_date;
use crate::infrastructure::serenity::SerenityClient;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Shared plumbing for the typed API wrappers: one client, one API group
#[derive(Clone)]
pub struct SerenityApi {
    client: Arc<SerenityClient>,
    api_group: &'static str,
}

impl SerenityApi {
    pub fn new(client: Arc<SerenityClient>, api_group: &'static str) -> Self {
        Self { client, api_group }
    }

    pub fn api_group(&self) -> &str {
        self.api_group
    }

    pub fn env(&self) -> Environment {
        self.client.env()
    }

    /// Call `api_path` within this wrapper's group, returning raw JSON
    pub async fn call_api(
        &self,
        api_path: &str,
        params: &[(String, String)],
        body_json: Option<Value>,
        call_type: Option<CallType>,
    ) -> SerenityResult<Value> {
        self.client
            .call_api(self.api_group, api_path, params, body_json, call_type)
            .await
    }

    /// GET with params; the most common case
    pub async fn get(&self, api_path: &str, params: &[(String, String)]) -> SerenityResult<Value> {
        self.call_api(api_path, params, None, None).await
    }

    /// `asOfDate` if given, else nothing and the service picks the latest
    pub fn create_std_params(as_of_date: Option<NaiveDate>) -> Vec<(String, String)> {
        as_of_date
            .map(|d| vec![("asOfDate".to_string(), format_date(d))])
            .unwrap_or_default()
    }
}

/// Pull `key` out of a response object and deserialize it
pub(crate) fn extract<T: DeserializeOwned>(response: &mut Value, key: &str) -> SerenityResult<T> {
    let value = response
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| SerenityError::parse(format!("response is missing {}", key)))?;
    serde_json::from_value(value).map_err(|e| SerenityError::parse(format!("{}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_std_params() {
        assert!(SerenityApi::create_std_params(None).is_empty());
        let params = SerenityApi::create_std_params(NaiveDate::from_ymd_opt(2022, 7, 1));
        assert_eq!(params, vec![("asOfDate".to_string(), "2022-07-01".to_string())]);
    }

    #[test]
    fn test_extract() {
        let mut response = json!({"assetType": [{"name": "TOKEN"}], "other": 1});
        let types: Vec<Value> = extract(&mut response, "assetType").unwrap();
        assert_eq!(types.len(), 1);
        assert!(extract::<Vec<Value>>(&mut response, "missing").is_err());
    }
}
