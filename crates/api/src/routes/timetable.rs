use axum::Json;
use sched_core::export::{group_timetable, Timetable};
use serde::Deserialize;
use types::SessionRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct TimetableIn {
    pub assignments: Vec<SessionRow>,
}

#[utoipa::path(
    post,
    path = "/v1/timetable",
    request_body = TimetableIn,
    responses(
        (status = 200, description = "Sessions grouped by group, then day, ordered by period")
    )
)]
pub async fn timetable(Json(input): Json<TimetableIn>) -> Json<Timetable> {
    Json(group_timetable(&input.assignments))
}
