//! Serenity REST plumbing: path mapping, the raw client and its HTTP transport.

pub mod client;
pub mod path_mapper;
pub mod transport;

pub use client::{SERENITY_API_VERSION, SerenityClient, camelize};
pub use path_mapper::ApiPathMapper;
pub use transport::HttpTransport;
