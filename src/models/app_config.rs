use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::clients::{BlogClient, OAuthClient, ProviderEndpoints};
use crate::error::ConfigError;
use crate::models::ConsumerCredentials;
use crate::store::TokenBackend;

/// Minimum length accepted for the cookie signing secret.
pub const SESSION_SECRET_MIN_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Keep tokens in the visitor's server-side session.
    Session,
    /// Persist tokens to the SQLite database at `--db-url`.
    Database,
}

#[derive(Debug, Parser)]
#[command(
    name = "tumblr-token-server",
    about = "Walks an operator through Tumblr's OAuth 1.0A flow and prints the resulting tokens"
)]
pub struct Cli {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Public base URL used to build the callback (default: http://localhost:<port>).
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long = "db-url", alias = "dbUrl", env = "DB_URL", default_value = "sqlite://tumblr-tokens.db")]
    pub db_url: String,

    #[arg(long = "consumer-key", aliases = ["consumer_key", "consumerKey"], env = "CONSUMER_KEY")]
    pub consumer_key: Option<String>,

    #[arg(long = "consumer-secret", aliases = ["consumer_secret", "consumerSecret"], env = "CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: Option<String>,

    /// Read when the consumer key/secret are not given directly.
    #[arg(long, env = "CREDENTIALS_FILE", default_value = "./credentials.json")]
    pub credentials_file: PathBuf,

    /// Cookie signing secret, at least 64 bytes.
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: String,

    #[arg(long, env = "TOKEN_STORE", value_enum, default_value_t = StoreKind::Session)]
    pub store: StoreKind,

    /// Drop and recreate the token tables before serving. Destroys stored tokens.
    #[arg(long)]
    pub reset_store: bool,

    #[arg(long, env = "SESSION_IDLE_HOURS", default_value_t = 6)]
    pub session_idle_hours: i64,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub host: String,
    pub db_url: String,
    pub credentials: ConsumerCredentials,
    pub session_secret: String,
    pub store: StoreKind,
    pub reset_store: bool,
    pub session_idle_hours: i64,
    pub http_timeout: Duration,
    pub endpoints: ProviderEndpoints,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        use dotenvy::dotenv;

        dotenv().ok();

        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if cli.session_secret.len() < SESSION_SECRET_MIN_LEN {
            return Err(ConfigError::SessionSecret(SESSION_SECRET_MIN_LEN));
        }
        if cli.session_idle_hours <= 0 {
            return Err(ConfigError::Invalid(
                "--session-idle-hours must be positive".to_string(),
            ));
        }

        let credentials = ConsumerCredentials::resolve(
            cli.consumer_key,
            cli.consumer_secret,
            &cli.credentials_file,
        )?;

        let host = cli
            .host
            .unwrap_or_else(|| format!("http://localhost:{}", cli.port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            port: cli.port,
            host,
            db_url: cli.db_url,
            credentials,
            session_secret: cli.session_secret,
            store: cli.store,
            reset_store: cli.reset_store,
            session_idle_hours: cli.session_idle_hours,
            http_timeout: Duration::from_secs(cli.http_timeout_secs),
            endpoints: ProviderEndpoints::default(),
        })
    }

    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.host)
    }
}

// Same rule as `ConsumerCredentials`: the signing secret stays out of Debug output.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("db_url", &self.db_url)
            .field("credentials", &self.credentials)
            .field("session_secret", &"<redacted>")
            .field("store", &self.store)
            .field("reset_store", &self.reset_store)
            .field("session_idle_hours", &self.session_idle_hours)
            .field("http_timeout", &self.http_timeout)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub oauth: Arc<dyn OAuthClient>,
    pub blog: Arc<dyn BlogClient>,
    pub tokens: TokenBackend,
}
