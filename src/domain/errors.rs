use thiserror::Error;

/// Errors surfaced by the SDK, from configuration loading through to parsing API responses
#[derive(Debug, Error)]
pub enum SerenityError {
    #[error("Generic API error: {detail}")]
    Api { detail: String },

    #[error("Unknown operation: {path} not mapped in {env}")]
    UnknownOperation { path: String, env: String },

    #[error("Unsupported operation: {path} not mapped in {env}")]
    UnsupportedOperation { path: String, env: String },

    #[error("Invalid connection config: {0}")]
    InvalidConfig(String),

    #[error("Unknown asset_id: {asset_id}")]
    UnknownAsset { asset_id: String },

    #[error("Unknown symbology {symbology} for {subject}")]
    UnknownSymbology { symbology: String, subject: String },

    #[error("Unknown symbol {symbol} in symbology {symbology}")]
    UnknownSymbol { symbol: String, symbology: String },

    #[error("Unknown ModelConfiguration: {short_name}")]
    UnknownModelConfiguration { short_name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SerenityResult<T> = Result<T, SerenityError>;

impl SerenityError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
