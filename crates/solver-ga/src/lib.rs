pub mod availability;
pub mod init;
pub mod operators;
pub mod search;

use async_trait::async_trait;
use sched_core::{validate_params, Catalog, SolveEnvelope, SolveError, SolveResult, Solver};

pub use availability::Availability;
pub use search::{GeneticSearch, Individual, SearchOutcome, StopReason};

#[derive(Clone, Copy, Debug, Default)]
pub struct GaSolver;

impl GaSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Validates the envelope, runs the search and packs the best schedule.
/// CPU-bound; call from a blocking context.
pub fn solve_envelope(env: &SolveEnvelope) -> Result<SolveResult, SolveError> {
    validate_params(&env.params)?;
    let catalog = Catalog::new(&env.instance)?;
    let out = GeneticSearch::new(&catalog, &env.params).run()?;
    let best = &out.best;

    Ok(SolveResult {
        status: "solved".into(),
        objective: best.scores.objective,
        fitness: best.fitness,
        assignments: best.schedule.to_rows(&catalog),
        stats: serde_json::json!({
            "method": "ga",
            "population": env.params.population_size,
            "seed": env.params.seed,
            "generations": out.generations,
            "stop_reason": out.stop_reason,
            "best_per_generation": out.best_per_generation,
            "init_restarts": out.init_restarts,
            "discarded_children": out.discarded_children,
            "costs": {
                "group_windows": best.scores.group_windows,
                "lecturer_windows": best.scores.lecturer_windows,
                "time_earliness": best.scores.time_earliness,
                "capacity_fill": best.scores.capacity_fill,
            },
        }),
    })
}

#[async_trait]
impl Solver for GaSolver {
    async fn solve(&self, env: SolveEnvelope) -> anyhow::Result<SolveResult> {
        let res = tokio::task::spawn_blocking(move || solve_envelope(&env)).await??;
        Ok(res)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sched_core::{Assignment, Catalog, GaParams, Instance};

    pub fn instance() -> Instance {
        serde_json::from_value(serde_json::json!({
            "times": [
                {"day": "Monday", "time": 1},
                {"day": "Monday", "time": 2},
                {"day": "Tuesday", "time": 1},
                {"day": "Tuesday", "time": 2}
            ],
            "subjects": [
                {"name": "Math", "hours": 2},
                {"name": "OOP", "hours": 1}
            ],
            "groups": [
                {"title": "K-17", "student_count": 20, "subject_names": ["Math", "OOP"]},
                {"title": "K-18", "student_count": 35, "subject_names": ["Math"]}
            ],
            "lectors": [
                {"name": "Ivanenko", "can_teach": ["Math"]},
                {"name": "Petrenko", "can_teach": ["Math", "OOP"]}
            ],
            "classrooms": [
                {"name": "101", "max_student_count": 40},
                {"name": "02", "max_student_count": 25}
            ]
        }))
        .expect("fixture instance")
    }

    pub fn catalog() -> Catalog {
        Catalog::new(&instance()).expect("fixture catalog")
    }

    /// One group, one subject, one lecturer, one classroom, one timeslot.
    pub fn single_slot_instance() -> Instance {
        serde_json::from_value(serde_json::json!({
            "times": [{"day": "Monday", "time": 1}],
            "subjects": [{"name": "Math", "hours": 1}],
            "groups": [{"title": "G", "student_count": 20, "subject_names": ["Math"]}],
            "lectors": [{"name": "L", "can_teach": ["Math"]}],
            "classrooms": [{"name": "R", "max_student_count": 30}]
        }))
        .expect("single slot instance")
    }

    /// Two groups competing for the only lecturer, classroom and timeslot.
    pub fn two_groups_one_slot_instance() -> Instance {
        serde_json::from_value(serde_json::json!({
            "times": [{"day": "Monday", "time": 1}],
            "subjects": [{"name": "Math", "hours": 1}],
            "groups": [
                {"title": "A", "student_count": 20, "subject_names": ["Math"]},
                {"title": "B", "student_count": 20, "subject_names": ["Math"]}
            ],
            "lectors": [{"name": "L", "can_teach": ["Math"]}],
            "classrooms": [{"name": "R", "max_student_count": 30}]
        }))
        .expect("two groups instance")
    }

    /// Fully bound assignment.
    pub fn complete(
        group: usize,
        subject: usize,
        lecturer: usize,
        classroom: usize,
        slot: usize,
    ) -> Assignment {
        Assignment {
            group,
            subject,
            lecturer: Some(lecturer),
            classroom: Some(classroom),
            slot: Some(slot),
        }
    }

    pub fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    pub fn small_params(seed: u64) -> GaParams {
        GaParams {
            population_size: 12,
            max_generations: 30,
            stagnation_limit: 10,
            tournament_size: 3,
            mutation_probability: 0.5,
            warmup_mutations: 200,
            max_init_attempts: 1000,
            elitism: 1,
            seed,
            ..GaParams::default()
        }
    }
}
