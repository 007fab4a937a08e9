//! Configuration for the Serenity SDK.
//!
//! Connection files (tenant, client credentials, endpoint) come from disk;
//! HTTP behaviour comes from environment variables.

mod connection_config;
mod sdk_env_config;

pub use connection_config::{ConnectionConfig, Environment, Region, load_local_config};
pub use sdk_env_config::{DEFAULT_AUTH_HOST, SdkEnvConfig};
