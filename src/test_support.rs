//! Fakes for the outbound clients plus helpers for driving the router in tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::{BlogClient, OAuthClient, ProviderEndpoints};
use crate::error::OAuthError;
use crate::models::{AccessToken, AppConfig, AppState, ConsumerCredentials, RequestToken, StoreKind};
use crate::store::TokenBackend;

pub const TEST_SESSION_SECRET: &str =
    "test-session-secret-test-session-secret-test-session-secret-0000";

/// Hands out `req-token-1`, `req-token-2`, ... and counts every call.
#[derive(Default)]
pub struct FakeOAuthClient {
    pub request_calls: AtomicUsize,
    pub access_calls: AtomicUsize,
    pub fail_request: bool,
    pub fail_access: bool,
    pub last_callback: Mutex<Option<String>>,
}

#[async_trait]
impl OAuthClient for FakeOAuthClient {
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken, OAuthError> {
        let n = self.request_calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_callback.lock().unwrap() = Some(callback_url.to_string());
        if self.fail_request {
            return Err(OAuthError::Http("provider unreachable".into()));
        }
        Ok(RequestToken {
            token: format!("req-token-{}", n),
            token_secret: format!("req-secret-{}", n),
        })
    }

    async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken, OAuthError> {
        self.access_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_access {
            return Err(OAuthError::Status {
                status: 401,
                body: "oauth_problem=token_rejected".into(),
            });
        }
        Ok(AccessToken {
            user_token: format!("user-for-{}-{}", request_token.token, verifier),
            user_token_secret: "user-secret".into(),
        })
    }
}

pub struct FakeBlogClient {
    pub calls: AtomicUsize,
    pub name: Option<String>,
}

impl Default for FakeBlogClient {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            name: Some("staff".into()),
        }
    }
}

#[async_trait]
impl BlogClient for FakeBlogClient {
    async fn user_name(
        &self,
        _consumer: &ConsumerCredentials,
        _access_token: &AccessToken,
    ) -> Result<String, OAuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.name
            .clone()
            .ok_or_else(|| OAuthError::Status {
                status: 401,
                body: "Unauthorized".into(),
            })
    }
}

/// Tumblr's paths rooted at a mock server.
pub fn mock_endpoints(base: &str) -> ProviderEndpoints {
    let base = base.trim_end_matches('/');
    ProviderEndpoints {
        request_token_url: format!("{}/oauth/request_token", base),
        authorize_url: format!("{}/oauth/authorize", base),
        access_token_url: format!("{}/oauth/access_token", base),
        user_info_url: format!("{}/v2/user/info", base),
    }
}

pub fn test_config(store: StoreKind) -> AppConfig {
    AppConfig {
        port: 3000,
        host: "http://localhost:3000".into(),
        db_url: "sqlite::memory:".into(),
        credentials: ConsumerCredentials {
            consumer_key: "consumer-key".into(),
            consumer_secret: "consumer-secret".into(),
        },
        session_secret: TEST_SESSION_SECRET.into(),
        store,
        reset_store: false,
        session_idle_hours: 6,
        http_timeout: Duration::from_secs(5),
        endpoints: ProviderEndpoints::default(),
    }
}

pub fn test_state(
    store: StoreKind,
    tokens: TokenBackend,
    oauth: Arc<FakeOAuthClient>,
    blog: Arc<FakeBlogClient>,
) -> AppState {
    AppState {
        config: test_config(store),
        oauth,
        blog,
        tokens,
    }
}
