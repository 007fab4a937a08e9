//! Client SDK for the Serenity risk analytics platform.
//!
//! [`application::api::SerenityApiProvider`] is the usual entry point: it
//! wraps a [`infrastructure::SerenityClient`] with typed refdata, risk,
//! valuation, pricing, model and scenario APIs.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
