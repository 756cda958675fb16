use crate::transport::http::types::{ApiResponse, AppState};
use crate::domain::ErrorKind;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (node reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (node unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.node.is_listening().await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "status": "ok" }))),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::failure(
                ErrorKind::UpstreamUnavailable,
                "Blockchain node is not listening",
            )),
        )
            .into_response(),
        Err(e) => {
            eprintln!("> Health check: node ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::failure(
                    ErrorKind::UpstreamUnavailable,
                    "Blockchain node unavailable",
                )),
            )
                .into_response()
        }
    }
}
