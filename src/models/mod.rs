pub mod app_config;
pub mod credentials;
pub mod oauth;

pub use app_config::{AppConfig, AppState, StoreKind};
pub use credentials::ConsumerCredentials;
pub use oauth::{AccessToken, OAuthSessionData, RequestToken};
