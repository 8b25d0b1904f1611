use crate::error::AppError;
use crate::models::AppState;
use crate::models::oauth::{CallbackParams, CredentialBlob};
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
};
use tower_sessions::Session;

/// Where Tumblr sends the browser back after the user approves the app.
///
/// Rejects the callback unless it carries both a token and a verifier, this visitor has
/// a pending request token, and the echoed token is that pending token. Only then is the
/// request token exchanged and the account looked up.
pub async fn callback_handler(
    params: Result<Query<CallbackParams>, QueryRejection>,
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable callback query");
            CallbackParams::default()
        }
    };
    let (oauth_token, oauth_verifier) = params
        .token_and_verifier()
        .ok_or(AppError::MissingParams)?;

    let tokens = app_state.tokens.for_visitor(&session).await?;
    let request_token = tokens
        .pending_request_token()
        .await?
        .ok_or(AppError::RequestTokenNotFound)?;

    if request_token.token != oauth_token {
        tracing::warn!(
            expected = %request_token.token,
            received = %oauth_token,
            "callback token does not match the pending request token"
        );
        return Err(AppError::TokenMismatch);
    }

    tokens.consume_request_token(&request_token.token).await?;

    tracing::info!("getting user token");
    let access_token = app_state
        .oauth
        .access_token(&request_token, oauth_verifier)
        .await
        .map_err(AppError::AccessToken)?;
    tokens.save_access_token(&access_token).await?;
    tracing::debug!(token = %access_token.user_token, "access token stored");

    let consumer = &app_state.config.credentials;
    let blog_name = app_state
        .blog
        .user_name(consumer, &access_token)
        .await
        .map_err(AppError::Identity)?;
    tokens.record_blog_name(&access_token, &blog_name).await?;
    session.save().await?;
    tracing::info!(blog = %blog_name, "user token retrieved");

    let blob = CredentialBlob {
        consumer_key: &consumer.consumer_key,
        consumer_secret: &consumer.consumer_secret,
        token: &access_token.user_token,
        token_secret: &access_token.user_token_secret,
    };
    let json = serde_json::to_string_pretty(&blob)?;

    let body = [
        format!("Successfully retrieved user token for {}!", blog_name),
        "Copy the text below to credentials.json:".to_string(),
        json,
    ]
    .join("\n\n");

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}
