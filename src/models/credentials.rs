use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

/// The registered application's key pair.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumerCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

// Debug output never includes the secret.
impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// On-disk layout of `credentials.json`. Both spellings are in circulation.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(alias = "consumerKey")]
    consumer_key: Option<String>,
    #[serde(alias = "consumerSecret")]
    consumer_secret: Option<String>,
}

impl ConsumerCredentials {
    /// Uses the explicit pair when both halves are given, otherwise falls back to the file.
    pub fn resolve(
        key: Option<String>,
        secret: Option<String>,
        file: &Path,
    ) -> Result<Self, ConfigError> {
        if let (Some(consumer_key), Some(consumer_secret)) = (key, secret) {
            return Ok(Self {
                consumer_key,
                consumer_secret,
            });
        }
        Self::from_file(file)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingCredentials(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::CredentialsFile(format!("{}: {}", path.display(), e)))?;
        let file: CredentialsFile = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::CredentialsFile(format!("{}: {}", path.display(), e)))?;

        match (file.consumer_key, file.consumer_secret) {
            (Some(consumer_key), Some(consumer_secret))
                if !consumer_key.is_empty() && !consumer_secret.is_empty() =>
            {
                Ok(Self {
                    consumer_key,
                    consumer_secret,
                })
            }
            _ => Err(ConfigError::CredentialsFile(format!(
                "{} does not contain a consumer key and secret",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_pair_wins() {
        let creds = ConsumerCredentials::resolve(
            Some("key".into()),
            Some("secret".into()),
            Path::new("/does/not/exist.json"),
        )
        .unwrap();
        assert_eq!(creds.consumer_key, "key");
        assert_eq!(creds.consumer_secret, "secret");
    }

    #[test]
    fn test_file_camel_case() {
        let file = write_file(r#"{"consumerKey": "ck", "consumerSecret": "cs"}"#);
        let creds = ConsumerCredentials::resolve(Some("ignored".into()), None, file.path()).unwrap();
        assert_eq!(creds.consumer_key, "ck");
        assert_eq!(creds.consumer_secret, "cs");
    }

    #[test]
    fn test_file_snake_case() {
        let file = write_file(r#"{"consumer_key": "ck", "consumer_secret": "cs", "token": "t"}"#);
        let creds = ConsumerCredentials::from_file(file.path()).unwrap();
        assert_eq!(creds.consumer_key, "ck");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = ConsumerCredentials::resolve(None, None, Path::new("/does/not/exist.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials(_)));
    }

    #[test]
    fn test_incomplete_file_is_rejected() {
        let file = write_file(r#"{"consumerKey": "ck"}"#);
        assert!(ConsumerCredentials::from_file(file.path()).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ConsumerCredentials {
            consumer_key: "ck".into(),
            consumer_secret: "super-secret".into(),
        };
        assert!(!format!("{:?}", creds).contains("super-secret"));
    }
}
