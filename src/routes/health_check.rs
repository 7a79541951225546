use axum::http::StatusCode;

/// Liveness check for the local server.
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
