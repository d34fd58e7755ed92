//! Public listing endpoints. Only approved listings are visible here.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::directory::ListingFilter;
use crate::rest::dto::{ListingDetail, ListingSummary};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

#[derive(Debug, Deserialize, Default)]
pub struct ListingQuery {
    /// Exact industry match, case-insensitive
    pub industry: Option<String>,
    /// Free-text match on name, description and tagline
    pub q: Option<String>,
}

/// List approved listings, featured first
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    params(
        ("industry" = Option<String>, Query, description = "Filter by industry"),
        ("q" = Option<String>, Query, description = "Free-text search")
    ),
    responses(
        (status = 200, description = "Approved listings", body = Vec<ListingSummary>)
    )
)]
pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<ListingQuery>,
) -> Json<Vec<ListingSummary>> {
    let filter = ListingFilter {
        industry: query.industry,
        query: query.q,
    };
    let listings = state.directory.public(&filter).await;
    Json(listings.iter().map(ListingSummary::from).collect())
}

/// Get one approved listing by slug
#[utoipa::path(
    get,
    path = "/api/v1/listings/{slug}",
    tag = "Listings",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    responses(
        (status = 200, description = "Listing detail", body = ListingDetail),
        (status = 404, description = "Listing not found or not public", body = ErrorResponse)
    )
)]
pub async fn detail(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<ListingDetail>, ApiError> {
    let business = state
        .directory
        .get(&slug)
        .await
        .filter(|b| b.is_public())
        .ok_or_else(|| ApiError::NotFound(format!("Listing '{slug}' not found")))?;
    Ok(Json(ListingDetail::from(&business)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::directory::{Business, DirectoryStore, Materializer, NewBusiness};
    use crate::telemetry::NoopSink;
    use std::sync::Arc;

    fn record(name: &str) -> NewBusiness {
        NewBusiness {
            business_name: name.to_string(),
            industry: "Tech".to_string(),
            business_type: "LLC".to_string(),
            description: "A business".to_string(),
            email: "owner@example.com".to_string(),
            phone: "555-0100".to_string(),
            website: None,
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            region: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: None,
            tagline: None,
            logo_url: None,
            facebook_url: None,
            instagram_url: None,
        }
    }

    async fn make_state() -> ApiState {
        let store = DirectoryStore::in_memory();
        let approved = store.materialize(record("Approved Co")).await.unwrap();
        store.materialize(record("Pending Co")).await.unwrap();
        store
            .update(&approved.slug, Business::approve)
            .await
            .unwrap();
        ApiState::new(Config::default(), store, Arc::new(NoopSink))
    }

    #[tokio::test]
    async fn test_list_only_shows_approved() {
        let state = make_state().await;
        let resp = list(State(state), Query(ListingQuery::default())).await;
        assert_eq!(resp.0.len(), 1);
        assert_eq!(resp.0[0].business_name, "Approved Co");
    }

    #[tokio::test]
    async fn test_detail_of_pending_is_not_found() {
        let state = make_state().await;
        let ok = detail(State(state.clone()), Path("approved-co".to_string())).await;
        assert!(ok.is_ok());
        let hidden = detail(State(state), Path("pending-co".to_string())).await;
        assert!(matches!(hidden, Err(ApiError::NotFound(_))));
    }
}
