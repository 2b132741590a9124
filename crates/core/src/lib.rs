pub mod catalog;
pub mod export;
pub mod schedule;
pub mod scoring;

use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub use catalog::{Catalog, TimeScores};
pub use schedule::{Assignment, Binding, ConflictReport, Dimension, Schedule};
pub use types::{
    Classroom, Day, GaParams, Group, Instance, Lecturer, Period, SessionRow, SolveEnvelope,
    SolveResult, Subject, Timeslot, Weights,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid instance: {}", .0.join("; "))]
    Defects(Vec<String>),
}

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        ValidationError::Defects(vec![msg.into()])
    }

    /// Individual defects, in the order they were found.
    pub fn errors(&self) -> Vec<String> {
        match self {
            ValidationError::Defects(errors) => errors.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no feasible schedule found after {attempts} initialization attempts; the instance is over-constrained")]
    Infeasible { attempts: u32 },
}

pub fn validate(inst: &Instance) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    for (name, empty) in [
        ("times", inst.times.is_empty()),
        ("subjects", inst.subjects.is_empty()),
        ("groups", inst.groups.is_empty()),
        ("lectors", inst.lectors.is_empty()),
        ("classrooms", inst.classrooms.is_empty()),
    ] {
        if empty {
            errors.push(format!("{name} is empty"));
        }
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name}: {s}"));
            }
        }
    }
    chk_unique("timeslot", inst.times.iter(), &mut errors);
    chk_unique("subject", inst.subjects.iter().map(|x| &x.name), &mut errors);
    chk_unique("group", inst.groups.iter().map(|x| &x.title), &mut errors);
    chk_unique("lector", inst.lectors.iter().map(|x| &x.name), &mut errors);
    chk_unique("classroom", inst.classrooms.iter().map(|x| &x.name), &mut errors);

    for t in &inst.times {
        if t.period.0 == 0 {
            errors.push(format!("timeslot {t} has period 0"));
        }
    }
    for s in &inst.subjects {
        if s.hours == 0 {
            errors.push(format!("subject {} has hours=0", s.name));
        }
    }
    for c in &inst.classrooms {
        if c.max_student_count == 0 {
            errors.push(format!("classroom {} has max_student_count=0", c.name));
        }
    }

    let subjects: HashSet<_> = inst.subjects.iter().map(|s| &s.name).collect();

    for l in &inst.lectors {
        for name in &l.can_teach {
            if !subjects.contains(name) {
                errors.push(format!(
                    "lector {} references missing subject {}",
                    l.name, name
                ));
            }
        }
    }

    for g in &inst.groups {
        if g.student_count == 0 {
            errors.push(format!("group {} has student_count=0", g.title));
        }
        let mut taken = HashSet::new();
        for name in &g.subject_names {
            if !taken.insert(name) {
                errors.push(format!("group {} lists subject {} twice", g.title, name));
            }
            if !subjects.contains(name) {
                errors.push(format!(
                    "group {} references missing subject {}",
                    g.title, name
                ));
            } else if !inst.lectors.iter().any(|l| l.can_teach.contains(name)) {
                errors.push(format!(
                    "group {} is unschedulable: no lector can teach {}",
                    g.title, name
                ));
            }
        }
        if !g.subject_names.is_empty()
            && !inst
                .classrooms
                .iter()
                .any(|c| c.max_student_count >= g.student_count)
        {
            errors.push(format!(
                "group {} is unschedulable: no classroom fits {} students",
                g.title, g.student_count
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Defects(errors))
    }
}

pub fn validate_params(p: &GaParams) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();
    if p.population_size == 0 {
        errors.push("population_size must be positive".into());
    }
    if p.tournament_size == 0 {
        errors.push("tournament_size must be positive".into());
    }
    if p.max_init_attempts == 0 {
        errors.push("max_init_attempts must be positive".into());
    }
    if p.elitism >= p.population_size && p.population_size > 0 {
        errors.push(format!(
            "elitism {} must be smaller than population_size {}",
            p.elitism, p.population_size
        ));
    }
    if !(0.0..=1.0).contains(&p.mutation_probability) {
        errors.push(format!(
            "mutation_probability {} is outside [0, 1]",
            p.mutation_probability
        ));
    }
    errors.extend(weight_defects(&p.weights));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Defects(errors))
    }
}

/// Rejects negative or non-finite weights, which would let the objective
/// drop below zero.
pub fn validate_weights(w: &Weights) -> Result<(), ValidationError> {
    let errors = weight_defects(w);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Defects(errors))
    }
}

fn weight_defects(w: &Weights) -> Vec<String> {
    let mut errors = Vec::new();
    for (name, v) in [
        ("group_windows", w.group_windows),
        ("lecturer_windows", w.lecturer_windows),
        ("time_earliness", w.time_earliness),
        ("capacity_fill", w.capacity_fill),
    ] {
        if !v.is_finite() || v < 0.0 {
            errors.push(format!("weight {name} must be finite and non-negative, got {v}"));
        }
    }
    errors
}

/// Reads a problem instance from a JSON file.
pub fn load_instance(path: impl AsRef<Path>) -> anyhow::Result<Instance> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening instance file {}", path.display()))?;
    let inst = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing instance file {}", path.display()))?;
    Ok(inst)
}

#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(&self, env: SolveEnvelope) -> anyhow::Result<SolveResult>;
}
