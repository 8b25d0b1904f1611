mod clients;
mod error;
mod handlers;
mod models;
mod store;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tumblr_token_server=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clients::{TumblrBlogClient, TumblrOAuthClient};
    use models::{AppConfig, AppState, StoreKind};
    use store::{SqliteTokenStore, TokenBackend};

    init_tracing();

    let app_config = AppConfig::from_env()?;

    let tokens = match app_config.store {
        StoreKind::Session => TokenBackend::Session,
        StoreKind::Database => {
            let db = SqliteTokenStore::connect(&app_config.db_url).await?;
            if app_config.reset_store {
                tracing::warn!(db_url = %app_config.db_url, "resetting token tables");
                db.reset().await?;
            }
            TokenBackend::Database(Arc::new(db))
        }
    };
    if app_config.reset_store && app_config.store == StoreKind::Session {
        tracing::warn!("--reset-store has no effect with the session store");
    }

    let http = reqwest::Client::builder()
        .timeout(app_config.http_timeout)
        .build()?;
    let endpoints = &app_config.endpoints;
    let oauth = TumblrOAuthClient::new(
        http.clone(),
        app_config.credentials.clone(),
        endpoints.request_token_url.clone(),
        endpoints.access_token_url.clone(),
    );
    let blog = TumblrBlogClient::new(http, endpoints.user_info_url.clone());

    let app_state = AppState {
        config: app_config.clone(),
        oauth: Arc::new(oauth),
        blog: Arc::new(blog),
        tokens,
    };
    let app = handlers::router(app_state)?;

    let addr = format!("0.0.0.0:{}", app_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, store = ?app_config.store, "listening");
    tracing::info!("Go to {}/authorize to get some Tumblr tokens!", app_config.host);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
