use axum::Json;
use sched_core::scoring::compute_soft_scores;
use sched_core::{validate_weights, Catalog, ConflictReport, Schedule};
use serde::{Deserialize, Serialize};
use types::{Instance, SessionRow, Weights};
use utoipa::ToSchema;

use crate::error::ApiError;

#[derive(Deserialize, ToSchema)]
pub struct ExplainIn {
    pub instance: Instance,
    pub assignments: Vec<SessionRow>,
    #[serde(default)]
    pub weights: Weights,
}

#[derive(Serialize, ToSchema)]
pub struct Costs {
    pub group_windows: f64,
    pub lecturer_windows: f64,
    pub time_earliness: f64,
    pub capacity_fill: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ExplainOut {
    pub costs: Costs,
    pub weights: Weights,
    pub objective: f64,
    pub fitness: f64,
    pub valid: bool,
    /// Sessions the instance requires that the rows do not cover.
    pub missing_sessions: usize,
    #[schema(value_type = Object)]
    pub conflicts: ConflictReport,
}

#[utoipa::path(
    post,
    path = "/v1/explain",
    request_body = ExplainIn,
    responses(
        (status = 200, description = "Cost breakdown and conflicts of the given timetable", body = ExplainOut),
        (status = 400, description = "Invalid instance, negative weights or unknown names in the rows")
    )
)]
pub async fn explain(Json(input): Json<ExplainIn>) -> Result<Json<ExplainOut>, ApiError> {
    validate_weights(&input.weights)?;
    let catalog = Catalog::new(&input.instance)?;
    let assignments = input
        .assignments
        .iter()
        .map(|row| catalog.resolve_row(row))
        .collect::<Result<Vec<_>, _>>()?;
    let schedule = Schedule::from_assignments(assignments);
    let scores = compute_soft_scores(&catalog, &schedule, &input.weights);
    let conflicts = schedule.conflict_report(&catalog);

    Ok(Json(ExplainOut {
        costs: Costs {
            group_windows: scores.group_windows,
            lecturer_windows: scores.lecturer_windows,
            time_earliness: scores.time_earliness,
            capacity_fill: scores.capacity_fill,
        },
        weights: input.weights,
        objective: scores.objective,
        fitness: scores.fitness(),
        valid: conflicts.is_empty(),
        missing_sessions: catalog.requirements().len().saturating_sub(schedule.len()),
        conflicts,
    }))
}
