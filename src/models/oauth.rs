use serde::{Deserialize, Serialize};

/// Temporary credentials handed out by the provider's request-token endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub token_secret: String,
}

/// Long-lived credentials returned by the access-token exchange.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub user_token: String,
    pub user_token_secret: String,
}

/// What the session remembers between `/authorize` and `/callback`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct OAuthSessionData {
    pub request_token: Option<RequestToken>,
    pub access_token: Option<AccessToken>,
    pub blog_name: Option<String>,
}

/// Query string of the provider redirect. `oauth_token` and `oauth_verifier` are the
/// canonical names; the camelCase spellings are accepted for older links.
#[derive(Debug, Deserialize, Default)]
pub struct CallbackParams {
    #[serde(alias = "oauthToken")]
    pub oauth_token: Option<String>,
    #[serde(alias = "oauthVerifier")]
    pub oauth_verifier: Option<String>,
}

impl CallbackParams {
    /// Returns the token and verifier when both are present and non-empty.
    pub fn token_and_verifier(&self) -> Option<(&str, &str)> {
        let token = self.oauth_token.as_deref().filter(|t| !t.is_empty())?;
        let verifier = self.oauth_verifier.as_deref().filter(|v| !v.is_empty())?;
        Some((token, verifier))
    }
}

/// The block the operator pastes into `credentials.json`.
#[derive(Debug, Serialize)]
pub struct CredentialBlob<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token: &'a str,
    pub token_secret: &'a str,
}

/// Body of `GET /session`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub blog_name: Option<String>,
    pub access_token: Option<String>,
    pub has_access_token_secret: bool,
}

impl From<&OAuthSessionData> for SessionSnapshot {
    fn from(data: &OAuthSessionData) -> Self {
        Self {
            blog_name: data.blog_name.clone(),
            access_token: data.access_token.as_ref().map(|t| t.user_token.clone()),
            has_access_token_secret: data
                .access_token
                .as_ref()
                .is_some_and(|t| !t.user_token_secret.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_params_snake_case() {
        let params: CallbackParams =
            serde_urlencoded::from_str("oauth_token=abc&oauth_verifier=xyz").unwrap();
        assert_eq!(params.token_and_verifier(), Some(("abc", "xyz")));
    }

    #[test]
    fn test_callback_params_camel_case() {
        let params: CallbackParams =
            serde_urlencoded::from_str("oauthToken=abc&oauthVerifier=xyz").unwrap();
        assert_eq!(params.token_and_verifier(), Some(("abc", "xyz")));
    }

    #[test]
    fn test_callback_params_empty_value_is_missing() {
        let params: CallbackParams =
            serde_urlencoded::from_str("oauth_token=&oauth_verifier=xyz").unwrap();
        assert!(params.token_and_verifier().is_none());
    }

    #[test]
    fn test_snapshot_of_empty_session() {
        let snapshot = SessionSnapshot::from(&OAuthSessionData::default());
        assert_eq!(snapshot.blog_name, None);
        assert_eq!(snapshot.access_token, None);
        assert!(!snapshot.has_access_token_secret);
    }

    #[test]
    fn test_credential_blob_fields() {
        let blob = CredentialBlob {
            consumer_key: "ck",
            consumer_secret: "cs",
            token: "t",
            token_secret: "ts",
        };
        let value = serde_json::to_value(&blob).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in ["consumer_key", "consumer_secret", "token", "token_secret"] {
            assert!(keys.contains(&key));
        }
    }
}
