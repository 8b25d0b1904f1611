use crate::error::AppError;
use crate::models::oauth::SessionSnapshot;
use crate::store::session::session_data;
use axum::{Json, response::IntoResponse};
use tower_sessions::Session;

/// Shows what the current browser session holds, for debugging an in-flight flow.
pub async fn session_handler(session: Session) -> Result<impl IntoResponse, AppError> {
    let data = session_data(&session).await?;
    Ok(Json(SessionSnapshot::from(&data)))
}
