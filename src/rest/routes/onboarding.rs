//! Onboarding wizard endpoints.
//!
//! Outcomes map onto HTTP the way form flows expect: ordering violations
//! become redirects to the step that still needs data, validation failures
//! re-render the step as 422 with per-field messages and echoed values,
//! and a successful final submission redirects to its confirmation.

use std::collections::HashMap;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::rest::dto::{
    ReviewResponse, StepViewResponse, SubmittedResponse, ValidationErrorResponse,
};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::session::SessionId;
use crate::rest::state::ApiState;
use crate::wizard::{
    Destination, EnterReview, EnterStep, OrderingRedirect, SubmitFinal, SubmitStep, WizardSession,
};

fn step_path(n: u32) -> String {
    format!("/api/v1/onboarding/step/{n}")
}

const REVIEW_PATH: &str = "/api/v1/onboarding/review";

/// Redirect for an out-of-sequence request, flagged so clients can show the
/// "complete previous steps first" notice.
fn ordering_response(redirect: &OrderingRedirect) -> Response {
    let target = format!(
        "{}?notice=complete-previous-steps",
        step_path(redirect.target)
    );
    Redirect::to(&target).into_response()
}

/// Render an onboarding step
#[utoipa::path(
    get,
    path = "/api/v1/onboarding/step/{n}",
    tag = "Onboarding",
    params(
        ("n" = u32, Path, description = "Step number (1-based)")
    ),
    responses(
        (status = 200, description = "Step form with pre-filled values", body = StepViewResponse),
        (status = 303, description = "Earlier steps are incomplete; redirect to the lowest missing step"),
        (status = 404, description = "No such step", body = ErrorResponse)
    )
)]
pub async fn enter_step(
    State(state): State<ApiState>,
    session: SessionId,
    Path(n): Path<u32>,
) -> Result<Response, ApiError> {
    let data = state.sessions.snapshot(&session.id).await;
    let wizard_session = WizardSession::load(&data, state.wizard.total_steps());

    let response = match state.wizard.enter_step(&wizard_session, n)? {
        EnterStep::Form(view) => Json(StepViewResponse::from(view)).into_response(),
        EnterStep::Redirect(redirect) => ordering_response(&redirect),
    };
    Ok(session.attach(response))
}

/// Submit an onboarding step
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/step/{n}",
    tag = "Onboarding",
    params(
        ("n" = u32, Path, description = "Step number (1-based)")
    ),
    responses(
        (status = 303, description = "Step accepted; redirect to the next step or review"),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 404, description = "No such step", body = ErrorResponse)
    )
)]
pub async fn submit_step(
    State(state): State<ApiState>,
    session: SessionId,
    Path(n): Path<u32>,
    Form(submitted): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let total = state.wizard.total_steps();
    let wizard = state.wizard.clone();

    let outcome = state
        .sessions
        .update(&session.id, |data| {
            let mut wizard_session = WizardSession::load(data, total);
            let outcome = wizard.submit_step(&mut wizard_session, n, submitted);
            if matches!(outcome, Ok(SubmitStep::Advance { .. })) {
                wizard_session.store(data, total);
            }
            outcome
        })
        .await?;

    let response = match outcome {
        SubmitStep::Advance { next, .. } => match next {
            Destination::Step(next_step) => Redirect::to(&step_path(next_step)).into_response(),
            Destination::Review => Redirect::to(REVIEW_PATH).into_response(),
        },
        SubmitStep::Invalid { errors, submitted } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse::new(n, errors, submitted)),
        )
            .into_response(),
        SubmitStep::Redirect(redirect) => ordering_response(&redirect),
    };
    Ok(session.attach(response))
}

/// Review all accumulated onboarding data
#[utoipa::path(
    get,
    path = "/api/v1/onboarding/review",
    tag = "Onboarding",
    responses(
        (status = 200, description = "All submitted step data for confirmation", body = ReviewResponse),
        (status = 303, description = "Wizard incomplete; redirect to the lowest missing step")
    )
)]
pub async fn review(State(state): State<ApiState>, session: SessionId) -> Response {
    let data = state.sessions.snapshot(&session.id).await;
    let wizard_session = WizardSession::load(&data, state.wizard.total_steps());

    let response = match state.wizard.enter_review(&wizard_session) {
        EnterReview::View(view) => Json(ReviewResponse::from(view)).into_response(),
        EnterReview::Redirect(redirect) => ordering_response(&redirect),
    };
    session.attach(response)
}

/// Submit the completed wizard, creating a pending listing
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/submit",
    tag = "Onboarding",
    responses(
        (status = 303, description = "Listing created; redirect to its confirmation"),
        (status = 503, description = "Persistence failed; session kept for retry", body = ErrorResponse)
    )
)]
pub async fn submit_final(
    State(state): State<ApiState>,
    session: SessionId,
) -> Result<Response, ApiError> {
    let total = state.wizard.total_steps();
    let data = state.sessions.snapshot(&session.id).await;
    let mut wizard_session = WizardSession::load(&data, total);

    // The materialize call happens outside the session lock; only a
    // successful submission writes the (wiped) wizard state back.
    let outcome = state
        .wizard
        .submit_final(&mut wizard_session, state.directory.as_ref())
        .await?;

    let response = match outcome {
        SubmitFinal::Submitted(business) => {
            state
                .sessions
                .update(&session.id, |data| wizard_session.store(data, total))
                .await;
            Redirect::to(&format!("/api/v1/onboarding/confirmation/{}", business.slug))
                .into_response()
        }
        SubmitFinal::Redirect(redirect) => ordering_response(&redirect),
    };
    Ok(session.attach(response))
}

/// Abandon the wizard, discarding all accumulated data
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/abandon",
    tag = "Onboarding",
    responses(
        (status = 303, description = "Wizard state discarded; redirect to step 1")
    )
)]
pub async fn abandon(State(state): State<ApiState>, session: SessionId) -> Response {
    let total = state.wizard.total_steps();
    let wizard = state.wizard.clone();

    state
        .sessions
        .update(&session.id, |data| {
            let mut wizard_session = WizardSession::load(data, total);
            wizard.abandon(&mut wizard_session);
            wizard_session.store(data, total);
        })
        .await;

    session.attach(Redirect::to(&step_path(1)).into_response())
}

/// Confirmation view for a submitted listing
#[utoipa::path(
    get,
    path = "/api/v1/onboarding/confirmation/{slug}",
    tag = "Onboarding",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    responses(
        (status = 200, description = "Submission confirmation", body = SubmittedResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse)
    )
)]
pub async fn confirmation(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<SubmittedResponse>, ApiError> {
    let business = state
        .directory
        .get(&slug)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Listing '{slug}' not found")))?;
    Ok(Json(SubmittedResponse::from(&business)))
}
