pub mod auth;
pub mod core;
pub mod mock;
pub mod serenity;

pub use auth::{AuthHeaders, ClientCredentialsTokenProvider, StaticTokenProvider};
pub use mock::MockTransport;
pub use serenity::{ApiPathMapper, HttpTransport, SerenityClient};
