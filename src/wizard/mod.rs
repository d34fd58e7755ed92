//! The onboarding wizard state machine.
//!
//! Session state goes in, an outcome comes out: every operation takes the
//! caller's [`WizardSession`] explicitly, so the machine has no ambient
//! state and tests drive it without an HTTP layer. Which step is "current"
//! is defined entirely by which step entries exist, not by a cursor.
//!
//! Outcomes a user can recover from (ordering violations, validation
//! failures) are ordinary values the caller branches on; the error channel
//! is reserved for unknown step numbers, corrupted sessions and storage
//! faults.

pub mod data;
pub mod session;

pub use data::{StepDataError, StepRecord};
pub use session::{SessionData, SessionStore, WizardSession};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;

use crate::directory::{Business, Materializer, PersistenceError};
use crate::schema::{FieldErrors, SchemaError, StepDefinition, StepRegistry};
use crate::telemetry::{TelemetryEvent, TelemetrySink};

/// Notice shown to users steered back to an earlier step.
pub const NOTICE_COMPLETE_PREVIOUS: &str = "complete previous steps first";

/// Failures that end a request rather than steering the user.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Step number outside the wizard's range: an input error, treated as
    /// not-found.
    #[error("no such onboarding step: {0}")]
    UnknownStep(u32),
    /// Accumulated session data no longer matches the step schema.
    #[error("onboarding session is inconsistent: {0}")]
    Corrupt(#[from] StepDataError),
    /// Storage fault at final submission. The session is left intact so the
    /// submission can be retried.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<SchemaError> for WizardError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::UnknownStep(n) => WizardError::UnknownStep(n),
        }
    }
}

/// Recoverable steer back to the lowest step that still needs data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingRedirect {
    pub target: u32,
    pub notice: &'static str,
}

impl OrderingRedirect {
    fn to_step(target: u32) -> Self {
        Self {
            target,
            notice: NOTICE_COMPLETE_PREVIOUS,
        }
    }
}

/// A step form ready to render: definition, any previously accepted values
/// for pre-fill, and overall progress.
#[derive(Debug, Clone)]
pub struct StepView {
    pub step: StepDefinition,
    pub total_steps: u32,
    pub prefill: BTreeMap<String, String>,
    pub progress_percent: u8,
}

#[derive(Debug, Clone)]
pub enum EnterStep {
    Form(StepView),
    Redirect(OrderingRedirect),
}

/// Where a successful step submission sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Step(u32),
    Review,
}

#[derive(Debug, Clone)]
pub enum SubmitStep {
    /// Validation passed; the step's data was replaced and the user moves on.
    Advance {
        next: Destination,
        progress_percent: u8,
    },
    /// Validation failed; the session is untouched and the submitted values
    /// are echoed back so the user does not retype them.
    Invalid {
        errors: FieldErrors,
        submitted: HashMap<String, String>,
    },
    Redirect(OrderingRedirect),
}

/// One step's accepted data as shown on the review screen.
#[derive(Debug, Clone)]
pub struct ReviewStep {
    pub number: u32,
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ReviewView {
    pub steps: Vec<ReviewStep>,
    pub progress_percent: u8,
}

#[derive(Debug, Clone)]
pub enum EnterReview {
    View(ReviewView),
    Redirect(OrderingRedirect),
}

#[derive(Debug, Clone)]
pub enum SubmitFinal {
    /// The listing was created and the session wiped.
    Submitted(Business),
    Redirect(OrderingRedirect),
}

/// The wizard state machine.
pub struct Wizard {
    registry: Arc<StepRegistry>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl Wizard {
    pub fn new(registry: Arc<StepRegistry>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            registry,
            telemetry,
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn telemetry(&self) -> &dyn TelemetrySink {
        self.telemetry.as_ref()
    }

    pub fn total_steps(&self) -> u32 {
        self.registry.total_steps()
    }

    /// Steps `1..n` must have data before step `n` may be touched.
    fn ordering_redirect(&self, session: &WizardSession, n: u32) -> Option<OrderingRedirect> {
        session
            .lowest_missing(n.saturating_sub(1))
            .map(OrderingRedirect::to_step)
    }

    /// Show step `n`: the definition plus any previously accepted values.
    /// Pure read; entering an earlier step changes nothing.
    pub fn enter_step(&self, session: &WizardSession, n: u32) -> Result<EnterStep, WizardError> {
        let step = self
            .registry
            .get_step(n)
            .ok_or(WizardError::UnknownStep(n))?;

        if let Some(redirect) = self.ordering_redirect(session, n) {
            return Ok(EnterStep::Redirect(redirect));
        }

        let prefill = session.step(n).map(StepRecord::to_fields).unwrap_or_default();
        Ok(EnterStep::Form(StepView {
            step: step.clone(),
            total_steps: self.total_steps(),
            prefill,
            progress_percent: session.progress_percent(self.total_steps()),
        }))
    }

    /// Validate and store a submission for step `n`.
    ///
    /// On success the step's previous data is replaced wholesale; other
    /// steps are untouched. On validation failure the session is not
    /// mutated at all.
    pub fn submit_step(
        &self,
        session: &mut WizardSession,
        n: u32,
        submitted: HashMap<String, String>,
    ) -> Result<SubmitStep, WizardError> {
        if self.registry.get_step(n).is_none() {
            return Err(WizardError::UnknownStep(n));
        }
        if let Some(redirect) = self.ordering_redirect(session, n) {
            return Ok(SubmitStep::Redirect(redirect));
        }

        match self.registry.validate(n, &submitted)? {
            Err(errors) => {
                self.telemetry.emit(TelemetryEvent::StepValidationFailed {
                    step: n,
                    error_count: errors.len(),
                });
                Ok(SubmitStep::Invalid { errors, submitted })
            }
            Ok(fields) => {
                let record = StepRecord::from_validated(n, &fields)?;
                session.set_step(n, record);
                self.telemetry
                    .emit(TelemetryEvent::StepCompleted { step: n });

                let next = if n < self.total_steps() {
                    Destination::Step(n + 1)
                } else {
                    Destination::Review
                };
                Ok(SubmitStep::Advance {
                    next,
                    progress_percent: session.progress_percent(self.total_steps()),
                })
            }
        }
    }

    /// Show everything accumulated so far for confirmation. Requires every
    /// step to have data; otherwise steers to the lowest missing one.
    pub fn enter_review(&self, session: &WizardSession) -> EnterReview {
        if let Some(missing) = session.lowest_missing(self.total_steps()) {
            return EnterReview::Redirect(OrderingRedirect::to_step(missing));
        }

        let steps = session
            .steps()
            .iter()
            .map(|(n, record)| ReviewStep {
                number: *n,
                title: self
                    .registry
                    .get_step(*n)
                    .map(|s| s.title.clone())
                    .unwrap_or_default(),
                fields: record.to_fields(),
            })
            .collect();

        EnterReview::View(ReviewView {
            steps,
            progress_percent: session.progress_percent(self.total_steps()),
        })
    }

    /// Explicitly abandon the wizard, dropping all accumulated step data.
    pub fn abandon(&self, session: &mut WizardSession) {
        session.clear();
    }

    /// Materialize the accumulated data into a listing and wipe the session.
    ///
    /// If the materializer fails, the session is left exactly as it was so
    /// the user can retry; the failure is surfaced for operators through the
    /// telemetry sink and returned as a retryable error.
    pub async fn submit_final(
        &self,
        session: &mut WizardSession,
        materializer: &dyn Materializer,
    ) -> Result<SubmitFinal, WizardError> {
        if let Some(missing) = session.lowest_missing(self.total_steps()) {
            return Ok(SubmitFinal::Redirect(OrderingRedirect::to_step(missing)));
        }

        let record = session.merged()?;
        match materializer.materialize(record).await {
            Ok(business) => {
                session.clear();
                self.telemetry.emit(TelemetryEvent::ListingSubmitted {
                    slug: business.slug.clone(),
                });
                Ok(SubmitFinal::Submitted(business))
            }
            Err(e) => {
                self.telemetry.emit(TelemetryEvent::PersistenceFailed {
                    detail: e.to_string(),
                });
                Err(e.into())
            }
        }
    }
}
