use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-level error taxonomy. Every error is converted to a structured
/// JSON response at the handler boundary; raw errors never reach clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("only image files allowed (got {0:?})")]
    NotAnImage(String),
    #[error("no image file found in upload")]
    MissingImage,
    #[error("invalid multipart upload: {0}")]
    Upload(String),
    #[error("model not loaded, please wait")]
    ModelUnavailable,
    #[error("could not decode uploaded image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("classification failed: {0}")]
    Classification(String),
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAnImage(_) | ApiError::MissingImage | ApiError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ModelUnavailable
            | ApiError::ImageDecode(_)
            | ApiError::Classification(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::error!("❌ Request failed ({}): {}", status.as_u16(), self);

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotAnImage("text/plain".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ModelUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Classification("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
