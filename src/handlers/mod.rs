pub mod credentials_handler;
pub mod index_handler;
pub mod oauth;

pub use credentials_handler::credentials_handler;
pub use index_handler::index_handler;
pub use oauth::{authorize_handler, callback_handler, session_handler};

use axum::{Router, routing::get};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::error::ConfigError;
use crate::models::{AppState, StoreKind};

/// Builds the HTTP surface. `/session` only exists for the session store and
/// `/credentials` only for the database store.
pub fn router(app_state: AppState) -> Result<Router, ConfigError> {
    let key = Key::try_from(app_state.config.session_secret.as_bytes())
        .map_err(|e| ConfigError::Invalid(format!("session secret: {}", e)))?;

    let session_store = MemoryStore::default();
    let session_expiry =
        Expiry::OnInactivity(Duration::hours(app_state.config.session_idle_hours));
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(session_expiry)
        .with_signed(key);

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/authorize", get(authorize_handler))
        .route("/callback", get(callback_handler));

    let router = match app_state.config.store {
        StoreKind::Session => router.route("/session", get(session_handler)),
        StoreKind::Database => router.route("/credentials", get(credentials_handler)),
    };

    Ok(router
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
