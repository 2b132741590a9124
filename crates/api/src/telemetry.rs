use anyhow::Context;
use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::map_response_body::MapResponseBodyLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Per-request limits of the HTTP layer.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpLimits {
    pub body_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            body_bytes: 8 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpLimits {
    /// Reads `TIMETABLE__SERVER__BODY_LIMIT` (bytes) and
    /// `TIMETABLE__SERVER__TIMEOUT_SECS`; unset variables keep the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|k| std::env::var(k).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut limits = Self::default();
        if let Some(v) = var("TIMETABLE__SERVER__BODY_LIMIT") {
            limits.body_bytes = v
                .trim()
                .parse()
                .with_context(|| format!("TIMETABLE__SERVER__BODY_LIMIT={v:?}"))?;
        }
        if let Some(v) = var("TIMETABLE__SERVER__TIMEOUT_SECS") {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("TIMETABLE__SERVER__TIMEOUT_SECS={v:?}"))?;
            limits.request_timeout = Duration::from_secs(secs);
        }
        Ok(limits)
    }
}

/// Wraps the router in request tracing, permissive CORS, the body limit and
/// the request timeout, outermost first.
pub fn layered(router: Router, limits: &HttpLimits) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(CorsLayer::permissive())
            .layer(MapResponseBodyLayer::new(axum::body::Body::new))
            .layer(RequestBodyLimitLayer::new(limits.body_bytes))
            .layer(TimeoutLayer::new(limits.request_timeout)),
    )
}
