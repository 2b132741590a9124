use parking_lot::RwLock;
use sched_core::{SolveEnvelope, SolveError, SolveResult, Solver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Solved { result: SolveResult },
    /// Initialization hit its restart ceiling.
    Infeasible { message: String },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    fn from_error(e: anyhow::Error) -> Self {
        match e.downcast_ref::<SolveError>() {
            Some(SolveError::Infeasible { .. }) => JobStatus::Infeasible {
                message: e.to_string(),
            },
            _ => JobStatus::Failed {
                message: format!("{e:#}"),
            },
        }
    }
}

/// Job table in process memory. Each job runs on its own tokio task.
#[derive(Clone)]
pub struct InMemJobs<S: Solver> {
    inner: Arc<RwLock<HashMap<String, JobStatus>>>,
    solver: Arc<S>,
}

impl<S: Solver> InMemJobs<S> {
    pub fn new(solver: S) -> Self {
        Self {
            inner: Default::default(),
            solver: Arc::new(solver),
        }
    }

    pub fn enqueue(&self, env: SolveEnvelope) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let solver = self.solver.clone();
        let job = id.clone();

        tokio::spawn(async move {
            map.write().insert(job.clone(), JobStatus::Running);
            let status = match solver.solve(env).await {
                Ok(result) => {
                    info!(job = %job, fitness = result.fitness, "job solved");
                    JobStatus::Solved { result }
                }
                Err(e) => {
                    let status = JobStatus::from_error(e);
                    match &status {
                        JobStatus::Infeasible { message } => warn!(job = %job, %message, "job infeasible"),
                        JobStatus::Failed { message } => error!(job = %job, %message, "job failed"),
                        _ => {}
                    }
                    status
                }
            };
            map.write().insert(job, status);
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().get(id).cloned()
    }
}
