use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::ports::{ApiRequest, ApiTransport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory transport: replays queued JSON responses in order and records
/// every request it was asked to send.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Value>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = Value>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_response(&self, response: Value) {
        self.responses.lock().await.push_back(response);
    }

    /// Everything sent so far, oldest first
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> SerenityResult<Value> {
        debug!("MockTransport: {} {}", request.call_type, request.url);
        self.requests.lock().await.push(request.clone());
        self.responses.lock().await.pop_front().ok_or_else(|| {
            SerenityError::Transport(format!(
                "MockTransport: no response queued for {} {}",
                request.call_type, request.url
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CallType;
    use serde_json::json;

    fn request(url: &str) -> ApiRequest {
        ApiRequest {
            call_type: CallType::Get,
            url: url.to_string(),
            query: vec![],
            headers: vec![],
            body: None,
        }
    }

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let transport = MockTransport::with_responses([json!({"n": 1})]);
        transport.push_response(json!({"n": 2})).await;

        assert_eq!(transport.send(request("http://a")).await.unwrap()["n"], 1);
        assert_eq!(transport.send(request("http://b")).await.unwrap()["n"], 2);
        assert!(transport.send(request("http://c")).await.is_err());

        let sent = transport.requests().await;
        assert_eq!(sent.len(), 3);
        assert_eq!(transport.last_request().await.unwrap().url, "http://c");
        assert_eq!(transport.remaining().await, 0);
    }
}
