//! Data Transfer Objects for the REST API.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::directory::Business;
use crate::schema::{FieldSchema, StepDefinition};
use crate::wizard::{ReviewView, StepView};

// =============================================================================
// Health DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Status response with store and wizard info
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub total_steps: u32,
    pub listing_count: usize,
    pub pending_count: usize,
    pub active_sessions: usize,
}

// =============================================================================
// Onboarding DTOs
// =============================================================================

/// One form field of a wizard step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepFieldDto {
    pub name: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl From<&FieldSchema> for StepFieldDto {
    fn from(field: &FieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            required: field.required,
            format: field.format.map(|f| match f {
                crate::schema::FieldFormat::Email => "email".to_string(),
                crate::schema::FieldFormat::Url => "url".to_string(),
            }),
            max_length: field.max_length,
            placeholder: field.placeholder.clone(),
        }
    }
}

/// A step form: definition, pre-filled values and progress
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepViewResponse {
    pub step: u32,
    pub title: String,
    pub total_steps: u32,
    pub progress_percent: u8,
    pub fields: Vec<StepFieldDto>,
    /// Previously accepted values for this step, if any
    pub prefill: BTreeMap<String, String>,
}

impl From<StepView> for StepViewResponse {
    fn from(view: StepView) -> Self {
        let StepDefinition {
            number,
            title,
            fields,
            ..
        } = view.step;
        Self {
            step: number,
            title,
            total_steps: view.total_steps,
            progress_percent: view.progress_percent,
            fields: fields.iter().map(StepFieldDto::from).collect(),
            prefill: view.prefill,
        }
    }
}

/// Validation failure for a step submission. Submitted values are echoed
/// back so the form can re-render without the user retyping.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub step: u32,
    pub field_errors: BTreeMap<String, Vec<String>>,
    pub submitted: HashMap<String, String>,
}

impl ValidationErrorResponse {
    pub fn new(
        step: u32,
        field_errors: BTreeMap<String, Vec<String>>,
        submitted: HashMap<String, String>,
    ) -> Self {
        Self {
            error: "validation_failed".to_string(),
            step,
            field_errors,
            submitted,
        }
    }
}

/// One step's accepted values on the review screen
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewStepDto {
    pub step: u32,
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

/// Review screen: everything accumulated so far
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub progress_percent: u8,
    pub steps: Vec<ReviewStepDto>,
}

impl From<ReviewView> for ReviewResponse {
    fn from(view: ReviewView) -> Self {
        Self {
            progress_percent: view.progress_percent,
            steps: view
                .steps
                .into_iter()
                .map(|s| ReviewStepDto {
                    step: s.number,
                    title: s.title,
                    fields: s.fields,
                })
                .collect(),
        }
    }
}

/// Confirmation that an onboarding submission created a listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmittedResponse {
    pub slug: String,
    pub business_name: String,
    pub status: String,
}

impl From<&Business> for SubmittedResponse {
    fn from(b: &Business) -> Self {
        Self {
            slug: b.slug.clone(),
            business_name: b.business_name.clone(),
            status: b.status.to_string(),
        }
    }
}

// =============================================================================
// Listing DTOs
// =============================================================================

/// Summary of a listing on the public index
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingSummary {
    pub slug: String,
    pub business_name: String,
    pub industry: String,
    pub city: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub featured: bool,
    pub verified: bool,
}

impl From<&Business> for ListingSummary {
    fn from(b: &Business) -> Self {
        Self {
            slug: b.slug.clone(),
            business_name: b.business_name.clone(),
            industry: b.industry.clone(),
            city: b.city.clone(),
            region: b.region.clone(),
            tagline: b.tagline.clone(),
            featured: b.featured,
            verified: b.verified,
        }
    }
}

/// Full public detail of an approved listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingDetail {
    pub slug: String,
    pub business_name: String,
    pub industry: String,
    pub business_type: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    pub featured: bool,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Business> for ListingDetail {
    fn from(b: &Business) -> Self {
        Self {
            slug: b.slug.clone(),
            business_name: b.business_name.clone(),
            industry: b.industry.clone(),
            business_type: b.business_type.clone(),
            description: b.description.clone(),
            email: b.email.clone(),
            phone: b.phone.clone(),
            website: b.website.clone(),
            address: b.address.clone(),
            city: b.city.clone(),
            region: b.region.clone(),
            postal_code: b.postal_code.clone(),
            country: b.country.clone(),
            tagline: b.tagline.clone(),
            logo_url: b.logo_url.clone(),
            facebook_url: b.facebook_url.clone(),
            instagram_url: b.instagram_url.clone(),
            featured: b.featured,
            verified: b.verified,
            created_at: b.created_at,
        }
    }
}

// =============================================================================
// Admin DTOs
// =============================================================================

/// Admin view of a listing, including lifecycle fields
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminListingDto {
    pub slug: String,
    pub business_name: String,
    pub industry: String,
    pub status: String,
    pub featured: bool,
    pub verified: bool,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Business> for AdminListingDto {
    fn from(b: &Business) -> Self {
        Self {
            slug: b.slug.clone(),
            business_name: b.business_name.clone(),
            industry: b.industry.clone(),
            status: b.status.to_string(),
            featured: b.featured,
            verified: b.verified,
            email: b.email.clone(),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
