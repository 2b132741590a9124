use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::Serialize;
use types::{SessionRow, Timeslot};

use crate::catalog::{Catalog, TimeScores};

/// A resource that must never be booked twice at the same timeslot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Group,
    Classroom,
    Lecturer,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Group, Dimension::Classroom, Dimension::Lecturer];
}

/// One of the three optional bindings of an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Classroom,
    Lecturer,
    Timeslot,
}

impl Binding {
    /// Fill order used when completing a partially bound schedule.
    pub const ALL: [Binding; 3] = [Binding::Classroom, Binding::Lecturer, Binding::Timeslot];
}

/// A group taking one session of a subject. `group` and `subject` are fixed
/// for the lifetime of a run; the optimizer only rebinds the other three.
/// All fields are catalog indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub group: usize,
    pub subject: usize,
    pub lecturer: Option<usize>,
    pub classroom: Option<usize>,
    pub slot: Option<usize>,
}

impl Assignment {
    pub fn new(group: usize, subject: usize) -> Self {
        Self {
            group,
            subject,
            lecturer: None,
            classroom: None,
            slot: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.lecturer.is_some() && self.classroom.is_some() && self.slot.is_some()
    }

    pub fn binding(&self, b: Binding) -> Option<usize> {
        match b {
            Binding::Classroom => self.classroom,
            Binding::Lecturer => self.lecturer,
            Binding::Timeslot => self.slot,
        }
    }

    /// Copy of `self` with one binding replaced.
    pub fn rebound(self, b: Binding, value: usize) -> Self {
        match b {
            Binding::Classroom => Self {
                classroom: Some(value),
                ..self
            },
            Binding::Lecturer => Self {
                lecturer: Some(value),
                ..self
            },
            Binding::Timeslot => Self {
                slot: Some(value),
                ..self
            },
        }
    }

    pub fn resource(&self, dim: Dimension) -> Option<usize> {
        match dim {
            Dimension::Group => Some(self.group),
            Dimension::Classroom => self.classroom,
            Dimension::Lecturer => self.lecturer,
        }
    }
}

/// Ordered, fixed-length collection of assignments. Treated as a value:
/// every operator returns a new schedule and leaves its inputs untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Schedule {
    assignments: Vec<Assignment>,
}

impl Schedule {
    /// One unbound assignment per required session.
    pub fn empty(catalog: &Catalog) -> Self {
        Self {
            assignments: catalog
                .requirements()
                .iter()
                .map(|&(g, s)| Assignment::new(g, s))
                .collect(),
        }
    }

    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.assignments.iter().all(Assignment::is_complete)
    }

    /// Consumes `self` and returns it with one binding of one assignment
    /// replaced. Clone first to keep the original.
    pub fn rebind(mut self, index: usize, b: Binding, value: usize) -> Self {
        self.assignments[index] = self.assignments[index].rebound(b, value);
        self
    }

    /// Timeslots at which each resource of `dim` is booked more than once.
    /// Only resources with at least one conflict appear; assignments without
    /// a timeslot or without the resource bound are ignored.
    pub fn conflicts_for(&self, dim: Dimension) -> BTreeMap<usize, Vec<usize>> {
        let mut counts: BTreeMap<(usize, usize), u32> = BTreeMap::new();
        for a in &self.assignments {
            if let (Some(r), Some(t)) = (a.resource(dim), a.slot) {
                *counts.entry((r, t)).or_default() += 1;
            }
        }
        let mut out: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for ((r, t), n) in counts {
            if n > 1 {
                out.entry(r).or_default().push(t);
            }
        }
        out
    }

    /// True iff no group, classroom or lecturer is booked twice at one timeslot.
    pub fn is_valid(&self) -> bool {
        let mut seen: HashSet<(Dimension, usize, usize)> =
            HashSet::with_capacity(self.assignments.len() * 3);
        for a in &self.assignments {
            let Some(t) = a.slot else { continue };
            for dim in Dimension::ALL {
                if let Some(r) = a.resource(dim) {
                    if !seen.insert((dim, r, t)) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Uniform per-index recombination. Both parents must come from the same
    /// catalog, so they share length and (group, subject) layout.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Schedule, rng: &mut R) -> Schedule {
        debug_assert_eq!(self.len(), other.len());
        let assignments = self
            .assignments
            .iter()
            .zip(&other.assignments)
            .map(|(mine, theirs)| if rng.gen_bool(0.5) { *theirs } else { *mine })
            .collect();
        Schedule { assignments }
    }

    /// Sum of chronological score gaps between consecutive sessions of every group.
    pub fn group_window_cost(&self, scores: &TimeScores) -> f64 {
        self.window_cost(scores, Dimension::Group)
    }

    /// Same as [`Schedule::group_window_cost`], keyed by lecturer.
    pub fn lecturer_window_cost(&self, scores: &TimeScores) -> f64 {
        self.window_cost(scores, Dimension::Lecturer)
    }

    fn window_cost(&self, scores: &TimeScores, dim: Dimension) -> f64 {
        let mut slots_by: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for a in &self.assignments {
            if let (Some(r), Some(t)) = (a.resource(dim), a.slot) {
                slots_by.entry(r).or_default().push(t);
            }
        }

        let mut cost = 0.0;
        for (_, mut slots) in slots_by {
            slots.sort_unstable();
            for w in slots.windows(2) {
                cost += scores.score(w[1]) - scores.score(w[0]);
            }
        }
        cost
    }

    /// Score of every occupied timeslot times the sessions placed in it.
    pub fn time_earliness_cost(&self, scores: &TimeScores) -> f64 {
        let mut per_slot: BTreeMap<usize, u32> = BTreeMap::new();
        for t in self.assignments.iter().filter_map(|a| a.slot) {
            *per_slot.entry(t).or_default() += 1;
        }
        per_slot
            .into_iter()
            .map(|(t, n)| scores.score(t) * f64::from(n))
            .sum()
    }

    /// Unused share of each booked classroom, summed.
    pub fn capacity_fill_cost(&self, catalog: &Catalog) -> f64 {
        self.assignments
            .iter()
            .filter_map(|a| a.classroom.map(|c| (a.group, c)))
            .map(|(g, c)| {
                let cap = f64::from(catalog.classrooms()[c].max_student_count);
                let size = f64::from(catalog.groups()[g].student_count);
                (cap - size) / cap
            })
            .sum()
    }

    /// Named rows for every complete assignment, in schedule order.
    pub fn to_rows(&self, catalog: &Catalog) -> Vec<SessionRow> {
        self.assignments
            .iter()
            .filter_map(|a| catalog.row_for(a))
            .collect()
    }

    pub fn conflict_report(&self, catalog: &Catalog) -> ConflictReport {
        let named = |dim: Dimension,
                     name: &dyn Fn(usize) -> String|
         -> BTreeMap<String, Vec<Timeslot>> {
            self.conflicts_for(dim)
                .into_iter()
                .map(|(r, slots)| {
                    (
                        name(r),
                        slots.into_iter().map(|t| catalog.times()[t]).collect(),
                    )
                })
                .collect()
        };
        ConflictReport {
            groups: named(Dimension::Group, &|i| catalog.groups()[i].title.0.clone()),
            classrooms: named(Dimension::Classroom, &|i| {
                catalog.classrooms()[i].name.0.clone()
            }),
            lecturers: named(Dimension::Lecturer, &|i| {
                catalog.lecturers()[i].name.0.clone()
            }),
        }
    }
}

/// Conflicts of a schedule keyed by resource name.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ConflictReport {
    pub groups: BTreeMap<String, Vec<Timeslot>>,
    pub classrooms: BTreeMap<String, Vec<Timeslot>>,
    pub lecturers: BTreeMap<String, Vec<Timeslot>>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.classrooms.is_empty() && self.lecturers.is_empty()
    }
}
