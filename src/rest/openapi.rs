//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::rest::dto::{
    AdminListingDto, HealthResponse, ListingDetail, ListingSummary, ReviewResponse, ReviewStepDto,
    StatusResponse, StepFieldDto, StepViewResponse, SubmittedResponse, ValidationErrorResponse,
};
use crate::rest::error::ErrorResponse;

/// OpenAPI documentation for the Listed REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Listed API",
        version = "0.1.0",
        description = "REST API for the Listed business directory: onboarding wizard, public listings and admin review.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Onboarding endpoints
        crate::rest::routes::onboarding::enter_step,
        crate::rest::routes::onboarding::submit_step,
        crate::rest::routes::onboarding::review,
        crate::rest::routes::onboarding::submit_final,
        crate::rest::routes::onboarding::abandon,
        crate::rest::routes::onboarding::confirmation,
        // Listing endpoints
        crate::rest::routes::listings::list,
        crate::rest::routes::listings::detail,
        // Admin endpoints
        crate::rest::routes::admin::list,
        crate::rest::routes::admin::approve,
        crate::rest::routes::admin::reject,
        crate::rest::routes::admin::feature,
        crate::rest::routes::admin::unfeature,
        crate::rest::routes::admin::verify,
    ),
    components(
        schemas(
            HealthResponse,
            StatusResponse,
            StepFieldDto,
            StepViewResponse,
            ValidationErrorResponse,
            ReviewStepDto,
            ReviewResponse,
            SubmittedResponse,
            ListingSummary,
            ListingDetail,
            AdminListingDto,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Onboarding", description = "Multi-step business onboarding wizard"),
        (name = "Listings", description = "Public directory of approved listings"),
        (name = "Admin", description = "Listing review and lifecycle management"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
