//! Outbound calls to Tumblr: the OAuth 1.0A token endpoints and the user API.

pub mod blog_client;
pub mod oauth_client;

pub use blog_client::TumblrBlogClient;
pub use oauth_client::TumblrOAuthClient;

use async_trait::async_trait;

use crate::error::OAuthError;
use crate::models::{AccessToken, ConsumerCredentials, RequestToken};

pub const TUMBLR_REQUEST_TOKEN_URL: &str = "https://www.tumblr.com/oauth/request_token";
pub const TUMBLR_AUTHORIZE_URL: &str = "https://www.tumblr.com/oauth/authorize";
pub const TUMBLR_ACCESS_TOKEN_URL: &str = "https://www.tumblr.com/oauth/access_token";
pub const TUMBLR_USER_INFO_URL: &str = "https://api.tumblr.com/v2/user/info";

/// Where each leg of the flow is sent. Defaults to Tumblr.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
    pub user_info_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            request_token_url: TUMBLR_REQUEST_TOKEN_URL.to_string(),
            authorize_url: TUMBLR_AUTHORIZE_URL.to_string(),
            access_token_url: TUMBLR_ACCESS_TOKEN_URL.to_string(),
            user_info_url: TUMBLR_USER_INFO_URL.to_string(),
        }
    }
}

/// The two signed token exchanges of OAuth 1.0A.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Obtains temporary credentials, announcing `callback_url` to the provider.
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken, OAuthError>;

    /// Trades an authorized request token and its verifier for an access token.
    async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken, OAuthError>;
}

/// The single blog API call this tool needs.
#[async_trait]
pub trait BlogClient: Send + Sync {
    /// Returns the account name the access token belongs to.
    async fn user_name(
        &self,
        consumer: &ConsumerCredentials,
        access_token: &AccessToken,
    ) -> Result<String, OAuthError>;
}
