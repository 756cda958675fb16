use crate::domain::{AuthorityService, ErrorKind, RelayError};
use crate::infra::ethereum::NodeRpc;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<AuthorityService>,
    pub node: Arc<dyn NodeRpc>,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct AddAuthorityNodeRequest {
    /// Address of the node to grant authority to. Ignored in diagnostic mode.
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            kind: Some(kind),
        }
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamUnavailable | ErrorKind::NodeRejected | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps a domain error to its stable response. The full error goes to stderr only.
pub fn error_response(context: &str, err: &RelayError) -> (StatusCode, Json<ApiResponse>) {
    eprintln!("> {} failed: {}", context, err);
    let kind = err.kind();
    let status = match err {
        RelayError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => status_for(kind),
    };
    (
        status,
        Json(ApiResponse::failure(kind, err.public_message())),
    )
}
