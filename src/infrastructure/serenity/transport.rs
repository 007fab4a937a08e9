use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::{ApiRequest, ApiTransport, CallType};
use crate::infrastructure::core::http_client_factory::build_url_with_query;
use async_trait::async_trait;
use reqwest::Method;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::debug;

/// [`ApiTransport`] over reqwest with retry middleware
pub struct HttpTransport {
    client: ClientWithMiddleware,
}

impl HttpTransport {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }
}

fn to_method(call_type: CallType) -> Method {
    match call_type {
        CallType::Delete => Method::DELETE,
        CallType::Get => Method::GET,
        CallType::Patch => Method::PATCH,
        CallType::Post => Method::POST,
        CallType::Put => Method::PUT,
    }
}

/// Decode a response body.
///
/// Error statuses still return the JSON body when it carries `detail` or
/// `message`, so the caller can surface the service's own explanation.
pub(crate) fn decode_body(status: u16, body: &str) -> SerenityResult<Value> {
    let success = (200..300).contains(&status);
    if body.trim().is_empty() {
        return if success {
            Ok(Value::Null)
        } else {
            Err(SerenityError::Http {
                status,
                body: String::new(),
            })
        };
    }

    match serde_json::from_str::<Value>(body) {
        Ok(json) if success => Ok(json),
        Ok(json) if json.get("detail").is_some() || json.get("message").is_some() => Ok(json),
        _ => Err(SerenityError::Http {
            status,
            body: body.to_string(),
        }),
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> SerenityResult<Value> {
        let url = build_url_with_query(&request.url, &request.query);
        let mut builder = self.client.request(to_method(request.call_type), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_string(body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SerenityError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SerenityError::Transport(e.to_string()))?;
        debug!("{} {} -> {} ({} bytes)", request.call_type, request.url, status, text.len());

        decode_body(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        assert_eq!(decode_body(200, r#"{"a":1}"#).unwrap()["a"], 1);
        assert_eq!(decode_body(204, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_error_with_detail_is_passed_through() {
        let json = decode_body(422, r#"{"detail":"Field required"}"#).unwrap();
        assert_eq!(json["detail"], "Field required");
    }

    #[test]
    fn test_decode_non_json_error() {
        match decode_body(502, "<html>Bad Gateway</html>") {
            Err(SerenityError::Http { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.contains("Bad Gateway"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(decode_body(500, r#"{"error":"x"}"#), Err(SerenityError::Http { .. })));
        assert!(matches!(decode_body(200, "not json"), Err(SerenityError::Http { .. })));
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_method(CallType::Get), Method::GET);
        assert_eq!(to_method(CallType::Put), Method::PUT);
    }
}
