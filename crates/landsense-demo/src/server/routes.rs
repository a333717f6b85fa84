use crate::state::DemoAppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use landsense_classifiers::sample::{self, SampleKind};
use landsense_core::ClassificationResult;
use serde_json::json;
use tracing::{debug, error};

// ============================================================================
// Health endpoints
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn status(State(state): State<DemoAppState>) -> impl IntoResponse {
    Json(state.status())
}

// ============================================================================
// Classification endpoints
// ============================================================================

/// Classify a raw image body
pub async fn classify(
    State(state): State<DemoAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ClassificationResult>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(ApiError::UnsupportedMediaType(format!(
            "expected an image/* body, got '{}'",
            content_type
        )));
    }

    debug!("Classifying {} byte {} upload", body.len(), content_type);

    let result = state.classifier.classify(&body).await?;
    Ok(Json(result))
}

/// Render a sample image as PNG
pub async fn sample_image(Path(kind): Path<String>) -> Result<Response, ApiError> {
    let kind: SampleKind = kind
        .parse()
        .map_err(|e: landsense_core::Error| ApiError::NotFound(e.to_string()))?;

    let png = sample::render_png(kind, &mut rand::thread_rng())?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    UnsupportedMediaType(String),
    Unprocessable(String),
    NotFound(String),
    Internal(String),
}

impl From<landsense_core::Error> for ApiError {
    fn from(err: landsense_core::Error) -> Self {
        if err.is_decode() {
            ApiError::Unprocessable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::UnsupportedMediaType(msg) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type", msg)
            }
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "decode_error", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
