//! Admin review endpoints: approve, reject, feature and verify listings.
//!
//! Authentication sits in front of these routes and is deployment-specific;
//! nothing here assumes a particular scheme.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::directory::{Business, ListingStatus};
use crate::rest::dto::AdminListingDto;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::telemetry::TelemetryEvent;

#[derive(Debug, Deserialize, Default)]
pub struct AdminQuery {
    /// Filter by lifecycle status
    pub status: Option<ListingStatus>,
}

/// List all listings for review, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/listings",
    tag = "Admin",
    params(
        ("status" = Option<String>, Query, description = "Filter by status: pending, approved or rejected")
    ),
    responses(
        (status = 200, description = "Listings with lifecycle fields", body = Vec<AdminListingDto>)
    )
)]
pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<AdminQuery>,
) -> Json<Vec<AdminListingDto>> {
    let listings = state.directory.by_status(query.status).await;
    Json(listings.iter().map(AdminListingDto::from).collect())
}

async fn transition(
    state: &ApiState,
    slug: &str,
    apply: impl FnOnce(&mut Business) -> Result<(), crate::directory::TransitionError>,
) -> Result<Json<AdminListingDto>, ApiError> {
    let updated = state.directory.update(slug, apply).await?;
    state.wizard.telemetry().emit(TelemetryEvent::StatusChanged {
        slug: updated.slug.clone(),
        status: updated.status.to_string(),
    });
    Ok(Json(AdminListingDto::from(&updated)))
}

/// Approve a pending listing
#[utoipa::path(
    post,
    path = "/api/v1/admin/listings/{slug}/approve",
    tag = "Admin",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing approved", body = AdminListingDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 409, description = "Listing is not pending", body = ErrorResponse)
    )
)]
pub async fn approve(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<AdminListingDto>, ApiError> {
    transition(&state, &slug, Business::approve).await
}

/// Reject a pending listing
#[utoipa::path(
    post,
    path = "/api/v1/admin/listings/{slug}/reject",
    tag = "Admin",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing rejected", body = AdminListingDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 409, description = "Listing is not pending", body = ErrorResponse)
    )
)]
pub async fn reject(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<AdminListingDto>, ApiError> {
    transition(&state, &slug, Business::reject).await
}

/// Feature an approved listing
#[utoipa::path(
    post,
    path = "/api/v1/admin/listings/{slug}/feature",
    tag = "Admin",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing featured", body = AdminListingDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 409, description = "Listing is not approved", body = ErrorResponse)
    )
)]
pub async fn feature(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<AdminListingDto>, ApiError> {
    transition(&state, &slug, |b| b.set_featured(true)).await
}

/// Remove a listing from the featured set
#[utoipa::path(
    post,
    path = "/api/v1/admin/listings/{slug}/unfeature",
    tag = "Admin",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing no longer featured", body = AdminListingDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 409, description = "Listing is not approved", body = ErrorResponse)
    )
)]
pub async fn unfeature(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<AdminListingDto>, ApiError> {
    transition(&state, &slug, |b| b.set_featured(false)).await
}

/// Mark an approved listing as verified
#[utoipa::path(
    post,
    path = "/api/v1/admin/listings/{slug}/verify",
    tag = "Admin",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing verified", body = AdminListingDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 409, description = "Listing is not approved", body = ErrorResponse)
    )
)]
pub async fn verify(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<AdminListingDto>, ApiError> {
    transition(&state, &slug, Business::verify).await
}
