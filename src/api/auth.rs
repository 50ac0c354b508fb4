// =============================================================================
// Bearer Token Authentication — Axum Extractor
// =============================================================================
//
// Extracts and validates a Bearer token from the `Authorization` header
// against the admin token held in `AppState` (read from
// `FOREX_INSIGHT_ADMIN_TOKEN` at startup). Comparison is performed in
// constant time.
//
// Usage as an Axum extractor:
//
//   async fn handler(_auth: AuthBearer, ...) { ... }
//
// If the token is missing or invalid, the extractor short-circuits the request
// with a 403 Forbidden response before the handler body executes.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::app_state::AppState;

/// Byte-wise equality whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Axum extractor that validates `Authorization: Bearer <token>`.
pub struct AuthBearer;

/// 403 with a JSON `{"error": ...}` body.
pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, axum::Json(serde_json::json!({ "error": self.0 }))).into_response()
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthBearer {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            warn!("FOREX_INSIGHT_ADMIN_TOKEN is not set — authenticated request rejected");
            return Err(AuthRejection("Server authentication not configured"));
        };

        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            warn!("Missing or malformed Authorization header");
            return Err(AuthRejection("Missing or invalid authorization token"));
        };

        if !constant_time_eq(token.as_bytes(), expected.as_bytes()) {
            warn!("Invalid admin token presented");
            return Err(AuthRejection("Invalid authorization token"));
        }

        Ok(AuthBearer)
    }
}
