mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod explain;
    pub mod health;
    pub mod jobs;
    pub mod solve;
    pub mod timetable;
    pub mod validate;
}

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::validate::validate_handler,
        routes::solve::solve,
        routes::jobs::status,
        routes::jobs::result,
        routes::explain::explain,
        routes::timetable::timetable,
    ),
    components(schemas(
        types::Instance, types::Subject, types::Group, types::Lecturer, types::Classroom,
        types::Timeslot, types::Day, types::Period, types::SubjectName, types::GroupTitle,
        types::LecturerName, types::ClassroomName, types::Weights, types::GaParams,
        types::SolveEnvelope, types::SolveResult, types::SessionRow,
        jobs::JobId, jobs::JobStatus,
        routes::validate::ValidationReport,
        routes::solve::JobCreated,
        routes::explain::ExplainIn,
        routes::explain::ExplainOut,
        routes::explain::Costs,
        routes::timetable::TimetableIn
    )),
    tags(
        (name = "timetable", description = "University timetabling API")
    )
)]
struct ApiDoc;

fn app(state: state::AppState, limits: &telemetry::HttpLimits) -> Router {
    let router = Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/solve", post(routes::solve::solve))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .route("/v1/explain", post(routes::explain::explain))
        .route("/v1/timetable", post(routes::timetable::timetable))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(state);
    telemetry::layered(router, limits)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let port = std::env::var("TIMETABLE__SERVER__PORT").unwrap_or_else(|_| "8080".into());
    let addr: std::net::SocketAddr = format!("0.0.0.0:{port}")
        .parse()
        .with_context(|| format!("invalid listen port {port}"))?;
    let limits = telemetry::HttpLimits::from_env()?;
    tracing::info!(%addr, ?limits, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state::AppState::new_default(), &limits)).await?;
    Ok(())
}
