use crate::config::SdkEnvConfig;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use url::form_urlencoded;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// HTTP client with exponential-backoff retry on transient failures,
    /// timeouts and retry count taken from `config`
    pub fn create_client(config: &SdkEnvConfig) -> ClientWithMiddleware {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.http_max_retries);

        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Append query parameters to a URL.
/// reqwest-middleware 0.5 doesn't expose `.query()`, so the query string is built here.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return base_url.to_string();
    }

    let query_string = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish();

    if base_url.contains('?') {
        format!("{}&{}", base_url, query_string)
    } else {
        format!("{}?{}", base_url, query_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_with_query() {
        let url = build_url_with_query(
            "https://serenity-rest.cloudwall.network/v1/risk/market/factor/returns",
            &[("as_of_date", "2021-07-28"), ("model_config_id", "a b")],
        );
        assert_eq!(
            url,
            "https://serenity-rest.cloudwall.network/v1/risk/market/factor/returns?as_of_date=2021-07-28&model_config_id=a+b"
        );
    }

    #[test]
    fn test_build_url_appends_to_existing_query() {
        let empty: [(&str, &str); 0] = [];
        assert_eq!(build_url_with_query("http://x/y", &empty), "http://x/y");
        assert_eq!(build_url_with_query("http://x/y?a=1", &[("b", "2")]), "http://x/y?a=1&b=2");
    }

    #[test]
    fn test_create_client_with_custom_retries() {
        let config = SdkEnvConfig {
            http_max_retries: 0,
            ..SdkEnvConfig::default()
        };
        let _client = HttpClientFactory::create_client(&config);
    }
}
