use crate::domain::ErrorKind;
use crate::transport::http::handlers::{authority, health, root};
use crate::transport::http::types::{AddAuthorityNodeRequest, ApiResponse};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root_handler,
        health::healthcheck_handler,
        authority::add_authority_node_handler
    ),
    components(schemas(ApiResponse, AddAuthorityNodeRequest, ErrorKind))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/", get(root::root_handler))
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/add-authority-node",
            post(authority::add_authority_node_handler),
        )
        .with_state(app_state)
}
