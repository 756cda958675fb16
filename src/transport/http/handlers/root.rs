use axum::http::StatusCode;
use axum::response::IntoResponse;

pub const GREETING: &str = "Hiiiii!!!!!!!!";

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Static greeting", body = String, content_type = "text/plain"))
)]
pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, GREETING)
}
