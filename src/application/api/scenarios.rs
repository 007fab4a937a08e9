use crate::application::api::core::SerenityApi;
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::CallType;
use crate::domain::types::scenarios::{
    Response, ScenarioCloneRequest, ScenarioDefinition, ScenarioRequest, ScenarioResult, ScenarioRun,
};
use crate::infrastructure::serenity::SerenityClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

fn parse_response<T: DeserializeOwned>(raw_json: Value) -> SerenityResult<Response<T>> {
    serde_json::from_value(raw_json).map_err(|e| SerenityError::parse(format!("scenario response: {}", e)))
}

/// Stress testing: custom scenario management and scenario runs
#[derive(Clone)]
pub struct ScenariosApi {
    api: SerenityApi,
}

impl ScenariosApi {
    pub fn new(client: Arc<SerenityClient>) -> Self {
        Self {
            api: SerenityApi::new(client, "risk/scenarios"),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        api_path: &str,
        params: &[(String, String)],
        body: Option<Value>,
        call_type: CallType,
    ) -> SerenityResult<Response<T>> {
        let raw_json = self.api.call_api(api_path, params, body, Some(call_type)).await?;
        parse_response(raw_json)
    }

    /// Copy a custom or predefined scenario into a new custom scenario
    pub async fn clone_scenario(&self, request: &ScenarioCloneRequest) -> SerenityResult<Response<ScenarioDefinition>> {
        let body = serde_json::to_value(request)?;
        self.call("/custom/clone", &[], Some(body), CallType::Post).await
    }

    /// Store a new custom scenario; the service allocates its ID
    pub async fn create_custom_scenario(
        &self,
        scenario: &ScenarioDefinition,
    ) -> SerenityResult<Response<ScenarioDefinition>> {
        let body = serde_json::to_value(scenario)?;
        self.call("/custom", &[], Some(body), CallType::Post).await
    }

    /// Soft delete; [`ScenariosApi::rollback_custom_scenario`] restores it
    pub async fn delete_custom_scenario(&self, scenario_id: Uuid) -> SerenityResult<Response<ScenarioDefinition>> {
        let path = format!("/custom/{}", scenario_id);
        self.call(&path, &[], None, CallType::Delete).await
    }

    /// Undo back to `version`, or restore a soft-deleted scenario
    pub async fn rollback_custom_scenario(
        &self,
        scenario_id: Uuid,
        version: u32,
    ) -> SerenityResult<Response<ScenarioDefinition>> {
        let path = format!("/custom/{}/rollback/{}", scenario_id, version);
        self.call(&path, &[], None, CallType::Post).await
    }

    /// Store a new version of an existing custom scenario. `version` should
    /// hold the latest version the caller has seen.
    pub async fn update_custom_scenario(
        &self,
        scenario: &ScenarioDefinition,
    ) -> SerenityResult<Response<ScenarioDefinition>> {
        let scenario_id = scenario
            .scenario_id
            .ok_or_else(|| SerenityError::invalid_input("cannot update a scenario without a scenario_id"))?;
        let path = format!("/custom/{}", scenario_id);
        let body = serde_json::to_value(scenario)?;
        self.call(&path, &[], Some(body), CallType::Put).await
    }

    /// Every version of one custom scenario, oldest first
    pub async fn get_custom_scenario_versions(
        &self,
        scenario_id: Uuid,
    ) -> SerenityResult<Response<Vec<ScenarioDefinition>>> {
        let path = format!("/custom/{}/versions", scenario_id);
        self.call(&path, &[], None, CallType::Get).await
    }

    /// Latest version of every custom scenario visible to the organization
    pub async fn get_custom_scenarios(&self) -> SerenityResult<Response<Vec<ScenarioDefinition>>> {
        self.call("/custom", &[], None, CallType::Get).await
    }

    pub async fn get_predefined_scenarios(&self) -> SerenityResult<Response<Vec<ScenarioDefinition>>> {
        self.call("/predefined", &[], None, CallType::Get).await
    }

    pub async fn get_scenario(&self, scenario_id: Uuid) -> SerenityResult<Response<ScenarioDefinition>> {
        let path = format!("/{}", scenario_id);
        self.call(&path, &[], None, CallType::Get).await
    }

    /// Start a run, by reference or with a transient definition. Poll
    /// [`ScenariosApi::get_scenario_run`] until the state is terminal.
    pub async fn run_scenario(&self, request: &ScenarioRequest) -> SerenityResult<Response<ScenarioResult>> {
        if request.scenario_id.is_none() && request.scenario.is_none() {
            return Err(SerenityError::invalid_input(
                "scenario run needs either a scenario_id or a scenario definition",
            ));
        }
        let body = serde_json::to_value(request)?;
        self.call("/run", &[], Some(body), CallType::Post).await
    }

    pub async fn get_scenario_run(&self, run_id: Uuid) -> SerenityResult<Response<ScenarioRun>> {
        let path = format!("/runs/{}", run_id);
        self.call(&path, &[], None, CallType::Get).await
    }

    /// Runs started by `owner_id`, or by the calling user when absent
    pub async fn get_scenario_runs(&self, owner_id: Option<&str>) -> SerenityResult<Response<Vec<ScenarioRun>>> {
        let params: Vec<(String, String)> = owner_id
            .map(|owner| vec![("owner_id".to_string(), owner.to_string())])
            .unwrap_or_default();
        self.call("/runs", &params, None, CallType::Get).await
    }

    pub async fn get_scenario_result(&self, run_id: Uuid) -> SerenityResult<Response<ScenarioResult>> {
        let path = format!("/runs/{}/result", run_id);
        self.call(&path, &[], None, CallType::Get).await
    }
}
