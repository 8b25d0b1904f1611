//! Where request and access tokens live between the steps of the flow.
//!
//! Handlers never see a global store: [`TokenBackend::for_visitor`] hands out a view
//! scoped to the browser session that made the request.

pub mod session;
pub mod sqlite;

pub use session::SessionTokenStore;
pub use sqlite::{SqliteTokenStore, VisitorTokenStore};

use std::sync::Arc;

use async_trait::async_trait;
use oauth2::CsrfToken;
use tower_sessions::Session;

use crate::error::StoreError;
use crate::models::{AccessToken, RequestToken};

/// Session key holding the random id that ties database rows to one browser.
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// Token storage as seen by one visitor.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save_request_token(&self, token: &RequestToken) -> Result<(), StoreError>;

    /// The most recent request token issued to this visitor, if any.
    async fn pending_request_token(&self) -> Result<Option<RequestToken>, StoreError>;

    /// Removes a request token once a callback has been accepted for it.
    async fn consume_request_token(&self, token: &str) -> Result<(), StoreError>;

    async fn save_access_token(&self, token: &AccessToken) -> Result<(), StoreError>;

    /// Attaches the account name to the access token saved for this visitor.
    async fn record_blog_name(
        &self,
        token: &AccessToken,
        blog_name: &str,
    ) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub enum TokenBackend {
    Session,
    Database(Arc<SqliteTokenStore>),
}

impl TokenBackend {
    pub async fn for_visitor(&self, session: &Session) -> Result<Box<dyn TokenStore>, StoreError> {
        match self {
            TokenBackend::Session => Ok(Box::new(SessionTokenStore::new(session.clone()))),
            TokenBackend::Database(db) => {
                let visitor = visitor_id(session).await?;
                Ok(Box::new(VisitorTokenStore::new(db.clone(), visitor)))
            }
        }
    }
}

/// Returns the visitor id stored in the session, minting one on first use.
async fn visitor_id(session: &Session) -> Result<String, StoreError> {
    if let Some(id) = session.get::<String>(VISITOR_ID_KEY).await? {
        return Ok(id);
    }
    let id = CsrfToken::new_random().secret().to_string();
    session.insert(VISITOR_ID_KEY, &id).await?;
    Ok(id)
}
