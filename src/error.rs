use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Startup failures. Any of these stops the process before it binds a port.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0}! Supply --consumer-key/--consumer-secret or create the file.")]
    MissingCredentials(String),

    #[error("Could not read credentials file {0}")]
    CredentialsFile(String),

    #[error("Session secret must be at least {0} bytes")]
    SessionSecret(usize),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures talking to the provider, either the token endpoints or the user API.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for OAuthError {
    fn from(err: reqwest::Error) -> Self {
        OAuthError::Http(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Everything a handler can fail with. Each variant renders as a flat text page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing token and/or verifier?")]
    MissingParams,

    #[error("Could not find request token!")]
    RequestTokenNotFound,

    #[error("Token mismatch!")]
    TokenMismatch,

    #[error("request token exchange failed: {0}")]
    RequestToken(#[source] OAuthError),

    #[error("access token exchange failed: {0}")]
    AccessToken(#[source] OAuthError),

    #[error("user info lookup failed: {0}")]
    Identity(#[source] OAuthError),

    #[error("token storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("could not render credentials: {0}")]
    Render(#[from] serde_json::Error),
}

impl AppError {
    /// Text shown to the operator. Upstream and storage failures all collapse to one line.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingParams => "Missing token and/or verifier?",
            AppError::RequestTokenNotFound => "Could not find request token!",
            AppError::TokenMismatch => "Token mismatch!",
            AppError::RequestToken(_) => "It did not work?",
            AppError::AccessToken(_)
            | AppError::Identity(_)
            | AppError::Store(_)
            | AppError::Render(_) => "It did not work.",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParams | AppError::TokenMismatch => StatusCode::BAD_REQUEST,
            AppError::RequestTokenNotFound => StatusCode::NOT_FOUND,
            AppError::RequestToken(_) | AppError::AccessToken(_) | AppError::Identity(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Store(_) | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Store(StoreError::Session(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_failures_share_one_message() {
        let exchange = AppError::AccessToken(OAuthError::Http("boom".into()));
        let identity = AppError::Identity(OAuthError::Status {
            status: 401,
            body: "nope".into(),
        });
        assert_eq!(exchange.public_message(), identity.public_message());
    }

    #[test]
    fn test_validation_messages_are_distinct() {
        let messages = [
            AppError::MissingParams.public_message(),
            AppError::RequestTokenNotFound.public_message(),
            AppError::TokenMismatch.public_message(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn test_statuses() {
        assert_eq!(AppError::MissingParams.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::RequestTokenNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Identity(OAuthError::Malformed("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_render_failure_is_generic_server_error() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.public_message(), "It did not work.");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
