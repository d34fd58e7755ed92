//! API error types and responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::directory::DirectoryError;
use crate::wizard::WizardError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Invalid lifecycle transition
    Conflict(String),
    /// Malformed request
    BadRequest(String),
    /// Storage fault; safe to retry
    ServiceUnavailable(String),
    /// Internal server error
    InternalError(String),
}

/// Error response body
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::UnknownStep(n) => {
                ApiError::NotFound(format!("Onboarding step {n} does not exist"))
            }
            WizardError::Corrupt(e) => ApiError::InternalError(e.to_string()),
            WizardError::Persistence(e) => ApiError::ServiceUnavailable(format!(
                "Could not save the listing; your progress is kept, please retry: {e}"
            )),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(slug) => {
                ApiError::NotFound(format!("Listing '{slug}' not found"))
            }
            DirectoryError::Transition(e) => ApiError::Conflict(e.to_string()),
            DirectoryError::Persistence(e) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ListingStatus, TransitionError};
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_response() {
        let error = ApiError::NotFound("Listing 'acme' not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "not_found");
    }

    #[tokio::test]
    async fn test_unknown_step_maps_to_not_found() {
        let response = ApiError::from(WizardError::UnknownStep(9)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transition_maps_to_conflict() {
        let err = DirectoryError::Transition(TransitionError::AlreadyReviewed(
            ListingStatus::Approved,
        ));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_persistence_maps_to_service_unavailable() {
        let err = WizardError::Persistence(crate::directory::PersistenceError::Io(
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        ));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
