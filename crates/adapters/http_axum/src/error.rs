//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use panelhub_domain::error::PanelHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PanelHubError`] to an HTTP response with appropriate status code.
pub struct ApiError(PanelHubError);

impl From<PanelHubError> for ApiError {
    fn from(err: PanelHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PanelHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            PanelHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            PanelHubError::UnknownEffect(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            PanelHubError::Device(err) => {
                tracing::warn!(error = %err, "device call failed");
                (StatusCode::BAD_GATEWAY, "device unavailable".to_string())
            }
            PanelHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
