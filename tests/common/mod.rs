#![allow(dead_code)]

use serde_json::Value;
use serenity_sdk::application::api::SerenityApiProvider;
use serenity_sdk::config::{ConnectionConfig, load_local_config};
use serenity_sdk::infrastructure::{MockTransport, SerenityClient, StaticTokenProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

pub const BTC: &str = "c7c5b6a0-8d0e-4b6a-9f0b-2a5b1a1e6f01";
pub const ETH: &str = "3f1e9d2c-6b4a-4e8f-a2c1-7d9e0b5c4a02";

pub fn btc() -> Uuid {
    Uuid::parse_str(BTC).unwrap()
}

pub fn eth() -> Uuid {
    Uuid::parse_str(ETH).unwrap()
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn load_fixture(name: &str) -> Value {
    let text = std::fs::read_to_string(fixtures_dir().join(name)).unwrap();
    serde_json::from_str(&text).unwrap()
}

pub fn dev_config() -> ConnectionConfig {
    load_local_config("test_config_v2_dev", Some(&fixtures_dir())).unwrap()
}

pub fn mock_client(responses: Vec<Value>) -> (Arc<SerenityClient>, MockTransport) {
    let transport = MockTransport::with_responses(responses);
    let client = SerenityClient::new(
        dev_config(),
        Arc::new(StaticTokenProvider::new("test-token")),
        Arc::new(transport.clone()),
    );
    (Arc::new(client), transport)
}

pub fn mock_provider(responses: Vec<Value>) -> (SerenityApiProvider, MockTransport) {
    let (client, transport) = mock_client(responses);
    (SerenityApiProvider::new(client), transport)
}
