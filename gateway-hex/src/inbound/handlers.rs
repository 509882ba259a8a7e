//! HTTP request handlers.
//!
//! Every gateway endpoint answers `200 OK` with an [`ApiResult`] envelope;
//! failures are reported in-band through `isSuccess` and `errorKind`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use gateway_types::{ApiResult, CacheBackend, EncryptionKeyResponse, ErrorKind, GatewayError};

use crate::GatewayService;

pub const KEY_IDENTIFIER_HEADER: &str = "X-Key-Identifier";

/// Application state shared across handlers.
pub struct AppState<B: CacheBackend> {
    pub service: GatewayService<B>,
}

/// Wrapper to implement IntoResponse for GatewayError (orphan rule workaround).
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        match kind {
            ErrorKind::System | ErrorKind::StoreUnavailable => {
                tracing::error!(error_kind = %kind, error = %self.0, "Request failed");
            }
            _ => tracing::warn!(error_kind = %kind, error = %self.0, "Request rejected"),
        }

        let body: ApiResult<()> = ApiResult::failure(kind, self.0.to_string());
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Issue a single-use encryption key.
#[tracing::instrument(skip(state))]
pub async fn issue_key<B: CacheBackend>(
    State(state): State<Arc<AppState<B>>>,
) -> Result<Json<ApiResult<EncryptionKeyResponse>>, ApiError> {
    let key = state.service.issue_key().await?;
    Ok(Json(ApiResult::success(key)))
}

/// Process an encrypted transaction.
///
/// The body is a JSON string holding the envelope; the key identifier
/// travels in the `X-Key-Identifier` header.
#[tracing::instrument(skip(state, headers, body))]
pub async fn process_transaction<B: CacheBackend>(
    State(state): State<Arc<AppState<B>>>,
    headers: HeaderMap,
    body: Result<Json<String>, JsonRejection>,
) -> Result<Json<ApiResult<String>>, ApiError> {
    let key_id = headers
        .get(KEY_IDENTIFIER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| GatewayError::validation("Missing X-Key-Identifier header"))?;

    let Json(envelope) = body.map_err(|rejection| {
        GatewayError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let reply = state.service.submit(key_id, &envelope).await?;
    Ok(Json(ApiResult::success(reply)))
}
