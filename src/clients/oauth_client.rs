use async_trait::async_trait;
use reqwest_oauth1::OAuthClientProvider;
use serde::Deserialize;

use super::OAuthClient;
use crate::error::OAuthError;
use crate::models::{AccessToken, ConsumerCredentials, RequestToken};

/// Form-encoded body returned by both token endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    oauth_token: String,
    oauth_token_secret: String,
}

/// HMAC-SHA1 signed token exchanges against Tumblr (or anything speaking the same protocol).
pub struct TumblrOAuthClient {
    http: reqwest::Client,
    consumer: ConsumerCredentials,
    request_token_url: String,
    access_token_url: String,
}

impl TumblrOAuthClient {
    pub fn new(
        http: reqwest::Client,
        consumer: ConsumerCredentials,
        request_token_url: impl Into<String>,
        access_token_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            consumer,
            request_token_url: request_token_url.into(),
            access_token_url: access_token_url.into(),
        }
    }
}

async fn read_token_response(response: reqwest::Response) -> Result<TokenResponse, OAuthError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(OAuthError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let token: TokenResponse =
        serde_urlencoded::from_str(&body).map_err(|e| OAuthError::Malformed(e.to_string()))?;
    if token.oauth_token.is_empty() {
        return Err(OAuthError::Malformed("empty oauth_token".to_string()));
    }
    Ok(token)
}

#[async_trait]
impl OAuthClient for TumblrOAuthClient {
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken, OAuthError> {
        let secrets = reqwest_oauth1::Secrets::new(
            self.consumer.consumer_key.as_str(),
            self.consumer.consumer_secret.as_str(),
        );

        tracing::debug!(url = %self.request_token_url, "requesting request token");
        let response = self
            .http
            .clone()
            .oauth1(secrets)
            .post(self.request_token_url.as_str())
            .query(&[("oauth_callback", callback_url)])
            .send()
            .await
            .map_err(|e| OAuthError::Http(e.to_string()))?;

        let token = read_token_response(response).await?;
        Ok(RequestToken {
            token: token.oauth_token,
            token_secret: token.oauth_token_secret,
        })
    }

    async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken, OAuthError> {
        let secrets = reqwest_oauth1::Secrets::new(
            self.consumer.consumer_key.as_str(),
            self.consumer.consumer_secret.as_str(),
        )
        .token(
            request_token.token.as_str(),
            request_token.token_secret.as_str(),
        );

        tracing::debug!(url = %self.access_token_url, "exchanging request token");
        let response = self
            .http
            .clone()
            .oauth1(secrets)
            .post(self.access_token_url.as_str())
            .query(&[("oauth_verifier", verifier)])
            .send()
            .await
            .map_err(|e| OAuthError::Http(e.to_string()))?;

        let token = read_token_response(response).await?;
        Ok(AccessToken {
            user_token: token.oauth_token,
            user_token_secret: token.oauth_token_secret,
        })
    }
}
