use axum::{extract::State, http::StatusCode, Json};
use sched_core::{validate, validate_params};
use types::SolveEnvelope;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(serde::Serialize, ToSchema)]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

/// Checks the instance and parameters up front so that a bad request never
/// becomes a failed job.
#[utoipa::path(
    post,
    path = "/v1/solve",
    request_body = SolveEnvelope,
    responses(
        (status = 202, description = "Job enqueued", body = JobCreated),
        (status = 400, description = "Invalid instance or parameters")
    )
)]
pub async fn solve(
    State(state): State<AppState>,
    Json(env): Json<SolveEnvelope>,
) -> Result<(StatusCode, Json<JobCreated>), ApiError> {
    validate(&env.instance)?;
    validate_params(&env.params)?;
    let id = state.jobs.enqueue(env);
    tracing::info!(job = %id.0, "solve job enqueued");
    Ok((
        StatusCode::ACCEPTED,
        Json(JobCreated {
            job_id: id.0,
            status: "queued",
        }),
    ))
}
