use axum::{http::header, response::IntoResponse};

pub async fn index_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Hi there! Go to /authorize to get your Tumblr credentials.",
    )
}
