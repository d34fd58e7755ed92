//! Listing directory: persistence and lifecycle for business records.
//!
//! Listings live in memory behind a read-write lock and, when a data
//! directory is configured, as one JSON file per listing. Writes go to disk
//! first and are registered in memory only once the file write succeeds, so
//! a storage fault never leaves a listing visible that was not persisted.

pub mod record;
pub mod slug;

pub use record::{Business, ListingStatus, NewBusiness, TransitionError};
pub use slug::{slugify, unique_slug, MAX_SLUG_ATTEMPTS};

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Storage faults while creating or updating a listing. Callers treat these
/// as retryable: nothing is registered in memory when one is returned.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not find a free slug for '{0}' after {MAX_SLUG_ATTEMPTS} attempts")]
    SlugSpaceExhausted(String),
    #[error("failed to encode listing: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write listing file: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory operation failures.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("listing '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Turns a complete onboarding record into a persisted listing.
///
/// Implementations must be atomic: either the full record with its generated
/// slug and pending status is persisted, or nothing is.
#[async_trait]
pub trait Materializer: Send + Sync {
    async fn materialize(&self, record: NewBusiness) -> Result<Business, PersistenceError>;
}

/// Filters for the public listing surface.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Exact industry match, case-insensitive
    pub industry: Option<String>,
    /// Free-text match against name, description and tagline
    pub query: Option<String>,
}

/// In-memory listing store with optional JSON file persistence.
pub struct DirectoryStore {
    data_dir: Option<PathBuf>,
    listings: RwLock<HashMap<String, Business>>,
}

impl DirectoryStore {
    /// Store without file persistence. Used by tests and ephemeral runs.
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            listings: RwLock::new(HashMap::new()),
        }
    }

    /// Store backed by one JSON file per listing under `data_dir`, loading
    /// whatever listings already exist there. Unreadable files are logged
    /// and skipped.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let mut listings = HashMap::new();

        if data_dir.exists() {
            let entries = std::fs::read_dir(&data_dir).with_context(|| {
                format!("failed to read listings directory: {}", data_dir.display())
            })?;
            for entry in entries {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                match std::fs::read_to_string(&path)
                    .map_err(anyhow::Error::from)
                    .and_then(|raw| serde_json::from_str::<Business>(&raw).map_err(Into::into))
                {
                    Ok(business) => {
                        debug!(slug = %business.slug, "loaded listing");
                        listings.insert(business.slug.clone(), business);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable listing file");
                    }
                }
            }
            info!("loaded {} listings from {}", listings.len(), data_dir.display());
        }

        Ok(Self {
            data_dir: Some(data_dir),
            listings: RwLock::new(listings),
        })
    }

    /// Fetch a listing by slug regardless of status.
    pub async fn get(&self, slug: &str) -> Option<Business> {
        self.listings.read().await.get(slug).cloned()
    }

    /// Approved listings matching `filter`, featured first, newest next.
    pub async fn public(&self, filter: &ListingFilter) -> Vec<Business> {
        let listings = self.listings.read().await;
        let mut matched: Vec<Business> = listings
            .values()
            .filter(|b| b.is_public() && Self::matches(b, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then(b.created_at.cmp(&a.created_at))
        });
        matched
    }

    /// All listings, optionally filtered by status, newest first.
    pub async fn by_status(&self, status: Option<ListingStatus>) -> Vec<Business> {
        let listings = self.listings.read().await;
        let mut matched: Vec<Business> = listings
            .values()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    pub async fn listing_count(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn pending_count(&self) -> usize {
        self.listings
            .read()
            .await
            .values()
            .filter(|b| b.status == ListingStatus::Pending)
            .count()
    }

    /// Apply a lifecycle change to a listing, persisting before the change
    /// becomes visible in memory.
    pub async fn update<F>(&self, slug: &str, apply: F) -> Result<Business, DirectoryError>
    where
        F: FnOnce(&mut Business) -> Result<(), TransitionError>,
    {
        let mut listings = self.listings.write().await;
        let current = listings
            .get(slug)
            .ok_or_else(|| DirectoryError::NotFound(slug.to_string()))?;

        let mut updated = current.clone();
        apply(&mut updated)?;
        updated.updated_at = Utc::now();

        self.persist(&updated).await?;
        listings.insert(slug.to_string(), updated.clone());
        debug!(slug, status = %updated.status, "listing updated");
        Ok(updated)
    }

    fn matches(business: &Business, filter: &ListingFilter) -> bool {
        if let Some(industry) = &filter.industry {
            if !business.industry.eq_ignore_ascii_case(industry) {
                return false;
            }
        }
        if let Some(query) = &filter.query {
            let needle = query.to_lowercase();
            let haystacks = [
                Some(&business.business_name),
                Some(&business.description),
                business.tagline.as_ref(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }

    async fn persist(&self, business: &Business) -> Result<(), PersistenceError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(business)?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.json", business.slug));
        tokio::fs::write(&path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl Materializer for DirectoryStore {
    /// Create a pending listing from a complete record.
    ///
    /// The slug check and insert happen under one write lock, so concurrent
    /// identical names within this process cannot collide; across processes
    /// the numeric-suffix retry is the (best-effort) guarantee.
    async fn materialize(&self, record: NewBusiness) -> Result<Business, PersistenceError> {
        let mut listings = self.listings.write().await;
        let slug = unique_slug(&record.business_name, |s| listings.contains_key(s))
            .ok_or_else(|| PersistenceError::SlugSpaceExhausted(record.business_name.clone()))?;

        let business = Business::create(record, slug.clone(), Utc::now());
        self.persist(&business).await?;
        listings.insert(slug, business.clone());
        info!(slug = %business.slug, "listing created");
        Ok(business)
    }
}
