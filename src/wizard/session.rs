//! Session-backed wizard state.
//!
//! The wizard owns exactly two key families in a browsing session's
//! key-value data: `onboarding_step_{n}` for per-step records and
//! `onboarding_progress` for the derived percent. Nothing else in the
//! session is read, written or cleared here.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use super::data::{merge_record, StepDataError, StepRecord};
use crate::directory::NewBusiness;

/// Session key prefix for per-step data.
pub const STEP_KEY_PREFIX: &str = "onboarding_step_";
/// Session key for the derived progress percent.
pub const PROGRESS_KEY: &str = "onboarding_progress";

/// Session key for step `n`'s data.
pub fn step_key(n: u32) -> String {
    format!("{STEP_KEY_PREFIX}{n}")
}

/// Generic per-session key-value data. The wizard is one tenant among
/// whatever else the host application keeps in a session.
pub type SessionData = HashMap<String, Value>;

/// The wizard's view of one browsing session: which steps have validated
/// data. Progress and completeness are derived from this, never stored as
/// independent state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardSession {
    steps: BTreeMap<u32, StepRecord>,
}

impl WizardSession {
    /// Read the wizard's keys out of a session's data. Entries that fail to
    /// parse or are filed under the wrong step are dropped with a warning;
    /// the user re-enters that step rather than the request failing.
    pub fn load(data: &SessionData, total_steps: u32) -> Self {
        let mut steps = BTreeMap::new();
        for n in 1..=total_steps {
            let Some(value) = data.get(&step_key(n)) else {
                continue;
            };
            match serde_json::from_value::<StepRecord>(value.clone()) {
                Ok(record) if record.step_number() == n => {
                    steps.insert(n, record);
                }
                Ok(record) => {
                    warn!(
                        step = n,
                        found = record.step_number(),
                        "session entry filed under the wrong step; dropping"
                    );
                }
                Err(e) => {
                    warn!(step = n, error = %e, "unreadable session step entry; dropping");
                }
            }
        }
        Self { steps }
    }

    /// Write the wizard's keys back into a session's data, replacing
    /// whatever wizard keys were there. An empty wizard leaves no keys
    /// behind at all.
    pub fn store(&self, data: &mut SessionData, total_steps: u32) {
        for n in 1..=total_steps {
            data.remove(&step_key(n));
        }
        data.remove(PROGRESS_KEY);

        if self.steps.is_empty() {
            return;
        }
        for (n, record) in &self.steps {
            match serde_json::to_value(record) {
                Ok(value) => {
                    data.insert(step_key(*n), value);
                }
                Err(e) => warn!(step = n, error = %e, "failed to encode session step entry"),
            }
        }
        data.insert(
            PROGRESS_KEY.to_string(),
            Value::from(self.progress_percent(total_steps)),
        );
    }

    pub fn step(&self, n: u32) -> Option<&StepRecord> {
        self.steps.get(&n)
    }

    pub fn set_step(&mut self, n: u32, record: StepRecord) {
        self.steps.insert(n, record);
    }

    pub fn steps(&self) -> &BTreeMap<u32, StepRecord> {
        &self.steps
    }

    /// Highest step `k` such that steps `1..=k` all have data.
    pub fn completed_through(&self) -> u32 {
        let mut k = 0;
        while self.steps.contains_key(&(k + 1)) {
            k += 1;
        }
        k
    }

    /// Lowest step in `1..=upto` without data, if any.
    pub fn lowest_missing(&self, upto: u32) -> Option<u32> {
        (1..=upto).find(|n| !self.steps.contains_key(n))
    }

    pub fn is_complete(&self, total_steps: u32) -> bool {
        self.lowest_missing(total_steps).is_none()
    }

    /// Percent of the wizard completed, derived from contiguous step data.
    pub fn progress_percent(&self, total_steps: u32) -> u8 {
        if total_steps == 0 {
            return 0;
        }
        (f64::from(self.completed_through()) * 100.0 / f64::from(total_steps)).round() as u8
    }

    /// Merge all step records into one complete business record.
    pub fn merged(&self) -> Result<NewBusiness, StepDataError> {
        merge_record(&self.steps)
    }

    /// Drop all wizard state. Stored afterwards, this removes every wizard
    /// key from the session.
    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

/// Shared in-memory session store, keyed by opaque session id.
///
/// Per-session data is the only shared mutable state in the wizard, and it
/// is scoped to a single browsing session; the lock here guards the map
/// itself, not any cross-session invariant.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a session's data; empty if the session is unknown.
    pub async fn snapshot(&self, session_id: &str) -> SessionData {
        self.inner
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Run `apply` against a session's data under the write lock, creating
    /// the session if needed and dropping it again if it ends up empty.
    pub async fn update<R>(&self, session_id: &str, apply: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut sessions = self.inner.write().await;
        let data = sessions.entry(session_id.to_string()).or_default();
        let result = apply(data);
        if data.is_empty() {
            sessions.remove(session_id);
        }
        result
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::data::test_support::record_for;
    use super::*;

    const TOTAL: u32 = 4;

    fn session_with(steps: &[u32]) -> WizardSession {
        let mut session = WizardSession::default();
        for &n in steps {
            session.set_step(n, record_for(n));
        }
        session
    }

    #[test]
    fn test_store_writes_contract_keys() {
        let mut data = SessionData::new();
        session_with(&[1, 2]).store(&mut data, TOTAL);

        assert!(data.contains_key("onboarding_step_1"));
        assert!(data.contains_key("onboarding_step_2"));
        assert!(!data.contains_key("onboarding_step_3"));
        assert_eq!(data.get("onboarding_progress").unwrap(), &Value::from(50));
    }

    #[test]
    fn test_load_store_roundtrip() {
        let session = session_with(&[1, 2, 3]);
        let mut data = SessionData::new();
        session.store(&mut data, TOTAL);
        assert_eq!(WizardSession::load(&data, TOTAL), session);
    }

    #[test]
    fn test_store_leaves_foreign_keys_alone() {
        let mut data = SessionData::new();
        data.insert("csrf_token".to_string(), Value::from("abc"));
        let mut session = session_with(&[1]);
        session.store(&mut data, TOTAL);

        session.clear();
        session.store(&mut data, TOTAL);
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("csrf_token").unwrap(), &Value::from("abc"));
    }

    #[test]
    fn test_clear_then_store_removes_all_wizard_keys() {
        let mut data = SessionData::new();
        let mut session = session_with(&[1, 2, 3, 4]);
        session.store(&mut data, TOTAL);
        assert_eq!(data.len(), 5);

        session.clear();
        session.store(&mut data, TOTAL);
        assert!(data.is_empty());
    }

    #[test]
    fn test_load_drops_unreadable_entry() {
        let mut data = SessionData::new();
        session_with(&[1]).store(&mut data, TOTAL);
        data.insert(step_key(2), Value::from("not a record"));

        let loaded = WizardSession::load(&data, TOTAL);
        assert!(loaded.step(1).is_some());
        assert!(loaded.step(2).is_none());
    }

    #[test]
    fn test_load_drops_misfiled_entry() {
        let mut data = SessionData::new();
        data.insert(
            step_key(2),
            serde_json::to_value(record_for(1)).unwrap(),
        );
        let loaded = WizardSession::load(&data, TOTAL);
        assert!(loaded.step(2).is_none());
    }

    #[test]
    fn test_completed_through_requires_contiguity() {
        assert_eq!(session_with(&[]).completed_through(), 0);
        assert_eq!(session_with(&[1, 2]).completed_through(), 2);
        assert_eq!(session_with(&[1, 3]).completed_through(), 1);
        assert_eq!(session_with(&[2, 3]).completed_through(), 0);
    }

    #[test]
    fn test_lowest_missing() {
        assert_eq!(session_with(&[]).lowest_missing(TOTAL), Some(1));
        assert_eq!(session_with(&[1, 2]).lowest_missing(TOTAL), Some(3));
        assert_eq!(session_with(&[1, 2, 4]).lowest_missing(TOTAL), Some(3));
        assert_eq!(session_with(&[1, 2, 3, 4]).lowest_missing(TOTAL), None);
        assert_eq!(session_with(&[]).lowest_missing(0), None);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(session_with(&[]).progress_percent(TOTAL), 0);
        assert_eq!(session_with(&[1]).progress_percent(TOTAL), 25);
        assert_eq!(session_with(&[1, 2]).progress_percent(TOTAL), 50);
        assert_eq!(session_with(&[1, 2, 3, 4]).progress_percent(TOTAL), 100);
    }

    #[test]
    fn test_progress_rounds() {
        let session = session_with(&[1]);
        assert_eq!(session.progress_percent(3), 33);
    }

    #[tokio::test]
    async fn test_session_store_isolates_sessions() {
        let store = SessionStore::new();
        store
            .update("a", |data| {
                data.insert("k".to_string(), Value::from(1));
            })
            .await;

        assert_eq!(store.snapshot("a").await.len(), 1);
        assert!(store.snapshot("b").await.is_empty());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_session_store_drops_emptied_sessions() {
        let store = SessionStore::new();
        store
            .update("a", |data| {
                data.insert("k".to_string(), Value::from(1));
            })
            .await;
        store
            .update("a", |data| {
                data.clear();
            })
            .await;
        assert_eq!(store.session_count().await, 0);
    }
}
