//! Request and access tokens kept in a SQLite file, each row tagged with the visitor
//! that started the flow.
//!
//! Schema: `request_tokens(token UNIQUE, token_secret, visitor, created_at)` and
//! `access_tokens(user_token UNIQUE, user_token_secret, visitor, blog_name, created_at)`.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use super::TokenStore;
use crate::error::StoreError;
use crate::models::{AccessToken, RequestToken};

/// Shared connection pool plus the schema bootstrap.
pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    /// Connects to a `SQLite` database (e.g. `"sqlite://tokens.db"`), creating the file and
    /// any missing tables. Existing rows are left alone.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        // Uniqueness lives in the table definition so `ON CONFLICT` always sees it.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS request_tokens (
                token        TEXT    NOT NULL UNIQUE,
                token_secret TEXT    NOT NULL,
                visitor      TEXT    NOT NULL,
                created_at   INTEGER NOT NULL DEFAULT (unixepoch())
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS access_tokens (
                user_token        TEXT    NOT NULL UNIQUE,
                user_token_secret TEXT    NOT NULL,
                visitor           TEXT    NOT NULL,
                blog_name         TEXT,
                created_at        INTEGER NOT NULL DEFAULT (unixepoch())
            )",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Drops both token tables and recreates them empty.
    ///
    /// Any access token the operator has not copied out yet is lost.
    pub async fn reset(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DROP TABLE IF EXISTS request_tokens")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS access_tokens")
            .execute(&self.pool)
            .await?;
        Self::migrate(&self.pool).await
    }

    async fn insert_request_token(
        &self,
        visitor: &str,
        token: &RequestToken,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO request_tokens (token, token_secret, visitor) VALUES (?, ?, ?)")
            .bind(&token.token)
            .bind(&token.token_secret)
            .bind(visitor)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn latest_request_token(&self, visitor: &str) -> Result<Option<RequestToken>, sqlx::Error> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT token, token_secret FROM request_tokens
             WHERE visitor = ? ORDER BY rowid DESC LIMIT 1",
        )
        .bind(visitor)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(token, token_secret)| RequestToken {
            token,
            token_secret,
        }))
    }

    async fn delete_request_token(&self, visitor: &str, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM request_tokens WHERE visitor = ? AND token = ?")
            .bind(visitor)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_access_token(
        &self,
        visitor: &str,
        token: &AccessToken,
    ) -> Result<(), sqlx::Error> {
        // Re-authorizing the same account can hand back the same token pair.
        sqlx::query(
            "INSERT INTO access_tokens (user_token, user_token_secret, visitor)
             VALUES (?, ?, ?)
             ON CONFLICT(user_token) DO UPDATE SET
                 user_token_secret = excluded.user_token_secret,
                 visitor = excluded.visitor,
                 blog_name = NULL",
        )
        .bind(&token.user_token)
        .bind(&token.user_token_secret)
        .bind(visitor)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_blog_name(
        &self,
        visitor: &str,
        token: &AccessToken,
        blog_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE access_tokens SET blog_name = ? WHERE user_token = ? AND visitor = ?")
            .bind(blog_name)
            .bind(&token.user_token)
            .bind(visitor)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// [`SqliteTokenStore`] restricted to the rows of one visitor.
pub struct VisitorTokenStore {
    db: Arc<SqliteTokenStore>,
    visitor: String,
}

impl VisitorTokenStore {
    pub fn new(db: Arc<SqliteTokenStore>, visitor: String) -> Self {
        Self { db, visitor }
    }
}

#[async_trait]
impl TokenStore for VisitorTokenStore {
    async fn save_request_token(&self, token: &RequestToken) -> Result<(), StoreError> {
        Ok(self.db.insert_request_token(&self.visitor, token).await?)
    }

    async fn pending_request_token(&self) -> Result<Option<RequestToken>, StoreError> {
        Ok(self.db.latest_request_token(&self.visitor).await?)
    }

    async fn consume_request_token(&self, token: &str) -> Result<(), StoreError> {
        Ok(self.db.delete_request_token(&self.visitor, token).await?)
    }

    async fn save_access_token(&self, token: &AccessToken) -> Result<(), StoreError> {
        Ok(self.db.upsert_access_token(&self.visitor, token).await?)
    }

    async fn record_blog_name(
        &self,
        token: &AccessToken,
        blog_name: &str,
    ) -> Result<(), StoreError> {
        Ok(self.db.set_blog_name(&self.visitor, token, blog_name).await?)
    }
}
