use crate::domain::errors::SerenityResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::fmt;

/// HTTP verbs understood by the raw client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Delete,
    Get,
    Patch,
    Post,
    Put,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Delete => "DELETE",
            CallType::Get => "GET",
            CallType::Patch => "PATCH",
            CallType::Post => "POST",
            CallType::Put => "PUT",
        }
    }

    /// True for verbs that carry a JSON body rather than a query string
    pub fn has_body(&self) -> bool {
        matches!(self, CallType::Post | CallType::Put | CallType::Patch)
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-resolved request, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub call_type: CallType,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Bearer token with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Treats the token as expired `skew` ahead of its real expiry
    pub fn is_expired(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now + skew >= self.expires_at
    }
}

// Need async_trait for async functions in traits
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Sends the request and returns the decoded JSON body
    async fn send(&self, request: ApiRequest) -> SerenityResult<Value>;
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self, scopes: &[String]) -> SerenityResult<AccessToken>;
}
