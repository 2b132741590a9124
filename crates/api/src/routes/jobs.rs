use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobs::JobStatus;

use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job status", body = JobStatus),
        (status = 404, description = "Unknown job")
    )
)]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    state
        .jobs
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("job {id} not found")))
}

/// The result once solved; otherwise the current status with 202 while the
/// job is pending, or 409 when it finished without a schedule.
#[utoipa::path(
    get,
    path = "/v1/jobs/{id}/result",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Solve result", body = SolveResult),
        (status = 202, description = "Still queued or running", body = JobStatus),
        (status = 404, description = "Unknown job"),
        (status = 409, description = "Job finished without a schedule", body = JobStatus)
    )
)]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let st = state
        .jobs
        .get(&id)
        .ok_or_else(|| ApiError::not_found(format!("job {id} not found")))?;
    Ok(match st {
        JobStatus::Solved { result } => Json(result).into_response(),
        pending @ (JobStatus::Queued | JobStatus::Running) => {
            (StatusCode::ACCEPTED, Json(pending)).into_response()
        }
        done => (StatusCode::CONFLICT, Json(done)).into_response(),
    })
}
