use crate::error::{AppError, OAuthError};
use crate::models::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use tower_sessions::Session;

/// Starts the flow: fetch a request token, remember it for this visitor, and send the
/// browser to Tumblr's authorize page.
pub async fn authorize_handler(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("getting request token");

    let callback_url = app_state.config.callback_url();
    let request_token = app_state
        .oauth
        .request_token(&callback_url)
        .await
        .map_err(AppError::RequestToken)?;
    tracing::debug!(token = %request_token.token, "request token issued");

    let tokens = app_state.tokens.for_visitor(&session).await?;
    tokens.save_request_token(&request_token).await?;
    session.save().await?;

    let mut url = reqwest::Url::parse(&app_state.config.endpoints.authorize_url)
        .map_err(|e| AppError::RequestToken(OAuthError::Malformed(e.to_string())))?;
    url.query_pairs_mut()
        .append_pair("oauth_token", &request_token.token)
        .append_pair("oauth_callback", &callback_url);

    tracing::info!(session_id = ?session.id(), "request token stored, redirecting to provider");
    Ok((StatusCode::FOUND, [(header::LOCATION, url.to_string())]))
}
