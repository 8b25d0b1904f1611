use async_trait::async_trait;
use reqwest_oauth1::OAuthClientProvider;
use serde::Deserialize;

use super::BlogClient;
use crate::error::OAuthError;
use crate::models::{AccessToken, ConsumerCredentials};

#[derive(Debug, Deserialize)]
struct UserInfoEnvelope {
    response: UserInfoResponse,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: UserInfo,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    name: String,
}

/// Calls `GET /v2/user/info` as the freshly authorized user.
///
/// Holds no per-user state: each call is signed with the credentials it is given, so
/// concurrent flows never see each other's tokens.
pub struct TumblrBlogClient {
    http: reqwest::Client,
    user_info_url: String,
}

impl TumblrBlogClient {
    pub fn new(http: reqwest::Client, user_info_url: impl Into<String>) -> Self {
        Self {
            http,
            user_info_url: user_info_url.into(),
        }
    }
}

#[async_trait]
impl BlogClient for TumblrBlogClient {
    async fn user_name(
        &self,
        consumer: &ConsumerCredentials,
        access_token: &AccessToken,
    ) -> Result<String, OAuthError> {
        let secrets = reqwest_oauth1::Secrets::new(
            consumer.consumer_key.as_str(),
            consumer.consumer_secret.as_str(),
        )
        .token(
            access_token.user_token.as_str(),
            access_token.user_token_secret.as_str(),
        );

        let response = self
            .http
            .clone()
            .oauth1(secrets)
            .get(self.user_info_url.as_str())
            .send()
            .await
            .map_err(|e| OAuthError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(OAuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: UserInfoEnvelope = response
            .json()
            .await
            .map_err(|e| OAuthError::Malformed(e.to_string()))?;
        Ok(envelope.response.user.name)
    }
}
