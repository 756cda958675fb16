use crate::domain::{RelayError, RelayMode};
use crate::transport::http::types::{error_response, AddAuthorityNodeRequest, AppState};
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Form, Json};

/// Diagnostic mode answers with the node's account list whatever the body holds.
/// Commit mode requires a valid address and answers with the transaction receipt.
///
/// The body is read as `application/x-www-form-urlencoded` when the request says so,
/// and as JSON otherwise.
#[utoipa::path(
    post,
    path = "/add-authority-node",
    request_body = AddAuthorityNodeRequest,
    responses(
        (status = 200, description = "Account list (diagnostic) or transaction receipt (commit)", body = Vec<String>),
        (status = 400, description = "Invalid node address", body = crate::transport::http::types::ApiResponse),
        (status = 422, description = "Unreadable JSON or form body", body = crate::transport::http::types::ApiResponse),
        (status = 500, description = "Node unavailable, node rejected the request, or internal error", body = crate::transport::http::types::ApiResponse)
    )
)]
pub async fn add_authority_node_handler(
    State(state): State<AppState>,
    request: Request,
) -> impl IntoResponse {
    let address = match read_body(request, &state).await {
        Ok(body) => {
            println!("> add-authority-node request: {:?}", body);
            body.address
        }
        Err(reason) => {
            if state.authority.mode() == RelayMode::Commit {
                let err = RelayError::InvalidBody(reason);
                return error_response("add-authority-node", &err).into_response();
            }
            println!("> add-authority-node request with unreadable body ignored: {}", reason);
            None
        }
    };

    match state.authority.add_authority_node(address.as_deref()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response("add-authority-node", &e).into_response(),
    }
}

async fn read_body(
    request: Request,
    state: &AppState,
) -> Result<AddAuthorityNodeRequest, String> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        Form::<AddAuthorityNodeRequest>::from_request(request, state)
            .await
            .map(|Form(body)| body)
            .map_err(|rejection| rejection.to_string())
    } else {
        Json::<AddAuthorityNodeRequest>::from_request(request, state)
            .await
            .map(|Json(body)| body)
            .map_err(|rejection| rejection.to_string())
    }
}
