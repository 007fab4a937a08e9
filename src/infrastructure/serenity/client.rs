use crate::config::{ConnectionConfig, Environment, Region, SdkEnvConfig};
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::{ApiRequest, ApiTransport, CallType, TokenProvider};
use crate::infrastructure::auth::{AuthHeaders, ClientCredentialsTokenProvider};
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use crate::infrastructure::serenity::path_mapper::ApiPathMapper;
use crate::infrastructure::serenity::transport::HttpTransport;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub const SERENITY_API_VERSION: &str = "v1";

/// Low-level client that can call any Serenity REST endpoint.
///
/// Typed wrappers live in [`crate::application::api`]; use this directly only
/// for operations those wrappers don't cover.
pub struct SerenityClient {
    config: ConnectionConfig,
    version: &'static str,
    auth_headers: AuthHeaders,
    api_mapper: ApiPathMapper,
    transport: Arc<dyn ApiTransport>,
}

impl SerenityClient {
    pub fn new(
        config: ConnectionConfig,
        token_provider: Arc<dyn TokenProvider>,
        transport: Arc<dyn ApiTransport>,
    ) -> Self {
        let auth_headers = AuthHeaders::new(
            token_provider,
            config.get_scopes(),
            config.user_application_id.clone(),
        );
        let api_mapper = ApiPathMapper::new(config.env);
        Self {
            config,
            version: SERENITY_API_VERSION,
            auth_headers,
            api_mapper,
            transport,
        }
    }

    /// Production wiring: client-credentials OAuth plus the retrying HTTP transport
    pub fn connect(config: ConnectionConfig, env_config: &SdkEnvConfig) -> Self {
        let token_provider = Arc::new(ClientCredentialsTokenProvider::from_config(&config, env_config));
        let transport = Arc::new(HttpTransport::new(HttpClientFactory::create_client(env_config)));
        Self::new(config, token_provider, transport)
    }

    pub fn with_path_mapper(mut self, api_mapper: ApiPathMapper) -> Self {
        self.api_mapper = api_mapper;
        self
    }

    pub fn env(&self) -> Environment {
        self.config.env
    }

    pub fn region(&self) -> Region {
        self.config.region
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Call `/{version}/{api_group}{api_path}`.
    ///
    /// `call_type` overrides the verb configured for the path. A POST with
    /// params folds them into the body (camelCased keys), placing the
    /// original body under `portfolio`; older callers pass the portfolio as
    /// the body and the as-of date and friends as params.
    pub async fn call_api(
        &self,
        api_group: &str,
        api_path: &str,
        params: &[(String, String)],
        body_json: Option<Value>,
        call_type: Option<CallType>,
    ) -> SerenityResult<Value> {
        let host = self.config.get_url();

        self.auth_headers.ensure_not_expired().await?;
        let headers = self.auth_headers.get_http_headers().await?;

        let full_api_path = format!("/{}{}", api_group, api_path);
        let mapped_path = self.api_mapper.get_api_path(&full_api_path)?;
        let url = format!("{}/{}{}", host, self.version, mapped_path);
        let call_type = match call_type {
            Some(call_type) => call_type,
            None => self.api_mapper.get_call_type(&full_api_path)?,
        };

        let (query, body) = if call_type == CallType::Post && !params.is_empty() {
            let mut folded = Map::new();
            for (key, value) in params {
                folded.insert(camelize(key), Value::String(value.clone()));
            }
            folded.insert("portfolio".to_string(), body_json.unwrap_or(Value::Null));
            (Vec::new(), Some(Value::Object(folded)))
        } else if call_type.has_body() {
            (params.to_vec(), body_json)
        } else {
            (params.to_vec(), None)
        };

        debug!("{} {}", call_type, url);
        let request = ApiRequest {
            call_type,
            url,
            query,
            headers,
            body,
        };
        let response = self.transport.send(request).await?;
        Self::check_response(response)
    }

    /// Turn a service-reported error (`detail` or `message`) into [`SerenityError::Api`]
    pub fn check_response(response_json: Value) -> SerenityResult<Value> {
        for key in ["detail", "message"] {
            if let Some(detail) = response_json.get(key) {
                let detail = match detail {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                warn!("Serenity API error: {}", detail);
                return Err(SerenityError::Api { detail });
            }
        }
        Ok(response_json)
    }
}

/// snake_case → camelCase; keys already in camelCase are unchanged
pub fn camelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
