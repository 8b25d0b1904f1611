use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::models::AppState;

/// Echoes the consumer credentials the server was started with.
pub async fn credentials_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    match serde_json::to_string_pretty(&app_state.config.credentials) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Your credentials:\n{}", json),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize credentials");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "It did not work.".to_string(),
            )
        }
    }
}
