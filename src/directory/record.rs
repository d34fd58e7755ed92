//! Business listing records and their lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Review status of a listing. New listings start pending and are invisible
/// to the public surface until approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Invalid lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("listing is already {0}; only pending listings can be reviewed")]
    AlreadyReviewed(ListingStatus),
    #[error("listing is {0}; only approved listings can be featured or verified")]
    NotApproved(ListingStatus),
}

/// A complete, validated business record ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBusiness {
    pub business_name: String,
    pub industry: String,
    pub business_type: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
}

/// A persisted business listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub slug: String,
    pub status: ListingStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub verified: bool,
    pub business_name: String,
    pub industry: String,
    pub business_type: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Create a pending listing from a complete record.
    pub fn create(record: NewBusiness, slug: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug,
            status: ListingStatus::Pending,
            featured: false,
            verified: false,
            business_name: record.business_name,
            industry: record.industry,
            business_type: record.business_type,
            description: record.description,
            email: record.email,
            phone: record.phone,
            website: record.website,
            address: record.address,
            city: record.city,
            region: record.region,
            postal_code: record.postal_code,
            country: record.country,
            tagline: record.tagline,
            logo_url: record.logo_url,
            facebook_url: record.facebook_url,
            instagram_url: record.instagram_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the listing is visible on the public surface.
    pub fn is_public(&self) -> bool {
        self.status == ListingStatus::Approved
    }

    /// Approve a pending listing.
    pub fn approve(&mut self) -> Result<(), TransitionError> {
        if self.status != ListingStatus::Pending {
            return Err(TransitionError::AlreadyReviewed(self.status));
        }
        self.status = ListingStatus::Approved;
        Ok(())
    }

    /// Reject a pending listing.
    pub fn reject(&mut self) -> Result<(), TransitionError> {
        if self.status != ListingStatus::Pending {
            return Err(TransitionError::AlreadyReviewed(self.status));
        }
        self.status = ListingStatus::Rejected;
        Ok(())
    }

    /// Mark an approved listing as featured (or clear the flag).
    pub fn set_featured(&mut self, featured: bool) -> Result<(), TransitionError> {
        if self.status != ListingStatus::Approved {
            return Err(TransitionError::NotApproved(self.status));
        }
        self.featured = featured;
        Ok(())
    }

    /// Mark an approved listing as verified.
    pub fn verify(&mut self) -> Result<(), TransitionError> {
        if self.status != ListingStatus::Approved {
            return Err(TransitionError::NotApproved(self.status));
        }
        self.verified = true;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A minimal valid record for store and transition tests.
    pub fn record(name: &str) -> NewBusiness {
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
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    fn listing() -> Business {
        Business::create(record("Acme Corp"), "acme-corp".to_string(), Utc::now())
    }

    #[test]
    fn test_new_listing_is_pending_and_hidden() {
        let listing = listing();
        assert_eq!(listing.status, ListingStatus::Pending);
        assert!(!listing.featured);
        assert!(!listing.verified);
        assert!(!listing.is_public());
    }

    #[test]
    fn test_approve_from_pending() {
        let mut listing = listing();
        listing.approve().unwrap();
        assert_eq!(listing.status, ListingStatus::Approved);
        assert!(listing.is_public());
    }

    #[test]
    fn test_reject_from_pending() {
        let mut listing = listing();
        listing.reject().unwrap();
        assert_eq!(listing.status, ListingStatus::Rejected);
        assert!(!listing.is_public());
    }

    #[test]
    fn test_approve_twice_is_an_error() {
        let mut listing = listing();
        listing.approve().unwrap();
        assert_eq!(
            listing.approve().unwrap_err(),
            TransitionError::AlreadyReviewed(ListingStatus::Approved)
        );
    }

    #[test]
    fn test_reject_after_approve_is_an_error() {
        let mut listing = listing();
        listing.approve().unwrap();
        assert!(matches!(
            listing.reject(),
            Err(TransitionError::AlreadyReviewed(ListingStatus::Approved))
        ));
    }

    #[test]
    fn test_feature_requires_approval() {
        let mut listing = listing();
        assert_eq!(
            listing.set_featured(true).unwrap_err(),
            TransitionError::NotApproved(ListingStatus::Pending)
        );
        listing.approve().unwrap();
        listing.set_featured(true).unwrap();
        assert!(listing.featured);
        listing.set_featured(false).unwrap();
        assert!(!listing.featured);
    }

    #[test]
    fn test_verify_requires_approval() {
        let mut listing = listing();
        assert!(listing.verify().is_err());
        listing.approve().unwrap();
        listing.verify().unwrap();
        assert!(listing.verified);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ListingStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
