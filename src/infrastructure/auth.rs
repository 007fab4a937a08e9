//! Bearer-token acquisition and the headers attached to every API call.

use crate::config::{ConnectionConfig, SdkEnvConfig};
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::{AccessToken, TokenProvider};
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::form_urlencoded;

/// Tokens are refreshed this long before they actually expire
pub const TOKEN_REFRESH_SKEW_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// OAuth2 client-credentials flow against the tenant's token endpoint
pub struct ClientCredentialsTokenProvider {
    client: ClientWithMiddleware,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsTokenProvider {
    pub fn new(
        client: ClientWithMiddleware,
        auth_host: &str,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                auth_host.trim_end_matches('/'),
                tenant_id
            ),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_config(config: &ConnectionConfig, env_config: &SdkEnvConfig) -> Self {
        Self::new(
            HttpClientFactory::create_client(env_config),
            &env_config.auth_host,
            &config.tenant_id,
            config.user_application_id.clone(),
            config.user_application_secret.clone(),
        )
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn form_body(&self, scopes: &[String]) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("scope", &scopes.join(" "))
            .finish()
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn fetch_token(&self, scopes: &[String]) -> SerenityResult<AccessToken> {
        debug!("Requesting access token from {}", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(self.form_body(scopes))
            .send()
            .await
            .map_err(|e| SerenityError::Auth(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SerenityError::Auth(format!(
                "token endpoint returned {}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SerenityError::Auth(format!("invalid token response: {}", e)))?;

        Ok(AccessToken::new(
            token.access_token,
            Utc::now() + Duration::seconds(token.expires_in),
        ))
    }
}

/// Hands out a fixed, pre-issued token. Used in tests and when a token is
/// obtained out of band.
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, Utc::now() + Duration::days(365)),
        }
    }

    pub fn with_expiry(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn fetch_token(&self, _scopes: &[String]) -> SerenityResult<AccessToken> {
        Ok(self.token.clone())
    }
}

/// Cached bearer token plus the HTTP headers every Serenity call needs
pub struct AuthHeaders {
    provider: Arc<dyn TokenProvider>,
    scopes: Vec<String>,
    user_app_id: String,
    token: RwLock<Option<AccessToken>>,
}

impl AuthHeaders {
    pub fn new(provider: Arc<dyn TokenProvider>, scopes: Vec<String>, user_app_id: impl Into<String>) -> Self {
        Self {
            provider,
            scopes,
            user_app_id: user_app_id.into(),
            token: RwLock::new(None),
        }
    }

    /// Fetch a new token when none is cached or the cached one expires within a minute
    pub async fn ensure_not_expired(&self) -> SerenityResult<()> {
        let skew = Duration::seconds(TOKEN_REFRESH_SKEW_SECS);
        {
            let token = self.token.read().await;
            if let Some(token) = token.as_ref()
                && !token.is_expired(Utc::now(), skew)
            {
                return Ok(());
            }
        }

        let mut token = self.token.write().await;
        // another task may have refreshed while we waited for the lock
        if let Some(current) = token.as_ref()
            && !current.is_expired(Utc::now(), skew)
        {
            return Ok(());
        }
        let fresh = self.provider.fetch_token(&self.scopes).await?;
        info!("Refreshed access token, expires at {}", fresh.expires_at);
        *token = Some(fresh);
        Ok(())
    }

    pub async fn get_http_headers(&self) -> SerenityResult<Vec<(String, String)>> {
        let token = self.token.read().await;
        let token = token
            .as_ref()
            .ok_or_else(|| SerenityError::Auth("no access token; call ensure_not_expired first".to_string()))?;
        Ok(vec![
            ("Authorization".to_string(), format!("Bearer {}", token.token)),
            ("X-User-Application-Id".to_string(), self.user_app_id.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        lifetime: Duration,
    }

    #[async_trait]
    impl TokenProvider for CountingProvider {
        async fn fetch_token(&self, scopes: &[String]) -> SerenityResult<AccessToken> {
            assert_eq!(scopes, ["https://serenity-api.cloudwall.network/.default"]);
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AccessToken::new(format!("token-{}", n), Utc::now() + self.lifetime))
        }
    }

    fn auth_headers(lifetime: Duration) -> (AuthHeaders, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            lifetime,
        });
        let headers = AuthHeaders::new(
            provider.clone(),
            vec!["https://serenity-api.cloudwall.network/.default".to_string()],
            "user-app",
        );
        (headers, provider)
    }

    #[tokio::test]
    async fn test_token_is_cached_until_near_expiry() {
        let (headers, provider) = auth_headers(Duration::hours(1));
        headers.ensure_not_expired().await.unwrap();
        headers.ensure_not_expired().await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let http = headers.get_http_headers().await.unwrap();
        assert_eq!(http[0], ("Authorization".to_string(), "Bearer token-1".to_string()));
        assert_eq!(http[1].1, "user-app");
        assert_eq!(http[2].1, "application/json");
    }

    #[tokio::test]
    async fn test_token_refreshed_inside_skew_window() {
        let (headers, provider) = auth_headers(Duration::seconds(30));
        headers.ensure_not_expired().await.unwrap();
        headers.ensure_not_expired().await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_headers_require_token() {
        let (headers, _) = auth_headers(Duration::hours(1));
        assert!(matches!(
            headers.get_http_headers().await,
            Err(SerenityError::Auth(_))
        ));
    }

    #[test]
    fn test_client_credentials_form() {
        let provider = ClientCredentialsTokenProvider::new(
            HttpClientFactory::create_client(&SdkEnvConfig::default()),
            "https://login.microsoftonline.com/",
            "pgi.cloudwall.network",
            "client",
            "s3cr&t",
        );
        assert_eq!(
            provider.token_url(),
            "https://login.microsoftonline.com/pgi.cloudwall.network/oauth2/v2.0/token"
        );
        let body = provider.form_body(&["a/.default".to_string(), "b".to_string()]);
        assert_eq!(
            body,
            "grant_type=client_credentials&client_id=client&client_secret=s3cr%26t&scope=a%2F.default+b"
        );
    }

    #[test]
    fn test_from_config_authenticates_as_user_application() {
        let raw = serde_json::json!({
            "schemaVersion": 2,
            "tenantId": "athansor.cloudwall.network",
            "clientId": "serenity-client",
            "userApplicationId": "user-app",
            "userApplicationSecret": "user-secret",
            "url": "https://serenity-rest.athansor.dev.cloudwall.network",
            "scope": "https://serenity-api-dev.athansor.cloudwall.network/.default",
            "environment": "DEV"
        });
        let config = ConnectionConfig::from_json(&raw, "test.json").unwrap();
        let provider = ClientCredentialsTokenProvider::from_config(&config, &SdkEnvConfig::default());

        let body = provider.form_body(&config.get_scopes());
        let fields: Vec<(String, String)> = form_urlencoded::parse(body.as_bytes()).into_owned().collect();
        assert!(fields.contains(&("client_id".to_string(), "user-app".to_string())));
        assert!(fields.contains(&("client_secret".to_string(), "user-secret".to_string())));
        assert!(!fields.iter().any(|(_, v)| v == "serenity-client"));
        assert!(provider.token_url().ends_with("/athansor.cloudwall.network/oauth2/v2.0/token"));
    }
}
