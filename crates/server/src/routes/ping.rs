use axum::{http::StatusCode, Json};

/// Liveness check
pub async fn ping() -> (StatusCode, Json<()>) {
    (StatusCode::OK, Json(()))
}
