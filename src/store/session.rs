use async_trait::async_trait;
use tower_sessions::Session;

use super::TokenStore;
use crate::error::StoreError;
use crate::models::{AccessToken, OAuthSessionData, RequestToken};

/// Session key holding [`OAuthSessionData`].
pub const OAUTH_DATA_KEY: &str = "oauth_data";

/// Keeps everything in the visitor's own session record.
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    async fn load(&self) -> Result<OAuthSessionData, StoreError> {
        Ok(self
            .session
            .get::<OAuthSessionData>(OAUTH_DATA_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn store(&self, data: &OAuthSessionData) -> Result<(), StoreError> {
        self.session.insert(OAUTH_DATA_KEY, data).await?;
        Ok(())
    }
}

/// Reads the session's OAuth record for `GET /session`.
pub async fn session_data(session: &Session) -> Result<OAuthSessionData, StoreError> {
    SessionTokenStore::new(session.clone()).load().await
}

#[async_trait]
impl TokenStore for SessionTokenStore {
    async fn save_request_token(&self, token: &RequestToken) -> Result<(), StoreError> {
        let mut data = self.load().await?;
        data.request_token = Some(token.clone());
        self.store(&data).await
    }

    async fn pending_request_token(&self) -> Result<Option<RequestToken>, StoreError> {
        Ok(self.load().await?.request_token)
    }

    async fn consume_request_token(&self, token: &str) -> Result<(), StoreError> {
        let mut data = self.load().await?;
        if data.request_token.as_ref().is_some_and(|t| t.token == token) {
            data.request_token = None;
            self.store(&data).await?;
        }
        Ok(())
    }

    async fn save_access_token(&self, token: &AccessToken) -> Result<(), StoreError> {
        let mut data = self.load().await?;
        data.access_token = Some(token.clone());
        data.blog_name = None;
        self.store(&data).await
    }

    async fn record_blog_name(
        &self,
        _token: &AccessToken,
        blog_name: &str,
    ) -> Result<(), StoreError> {
        let mut data = self.load().await?;
        data.blog_name = Some(blog_name.to_string());
        self.store(&data).await
    }
}
