use std::collections::HashMap;

use types::{Classroom, Group, Instance, Lecturer, SessionRow, Subject, Timeslot};

use crate::schedule::Assignment;
use crate::{validate, ValidationError};

/// Earliness score per timeslot index. Lower is earlier in the week.
#[derive(Clone, Debug)]
pub struct TimeScores(Vec<f64>);

impl TimeScores {
    #[inline]
    pub fn score(&self, slot: usize) -> f64 {
        self.0[slot]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated, index-addressed view of an [`Instance`].
///
/// Entities are referred to by their position in the catalog's vectors.
/// Timeslots are stored in chronological order, so a slot index is also
/// its earliness score. Lecturers and classrooms are stored sorted by name,
/// so any ascending list of their indices is ordered by name.
#[derive(Clone, Debug)]
pub struct Catalog {
    times: Vec<Timeslot>,
    subjects: Vec<Subject>,
    groups: Vec<Group>,
    lecturers: Vec<Lecturer>,
    classrooms: Vec<Classroom>,

    qualified: Vec<Vec<usize>>,
    roomy: Vec<Vec<usize>>,
    requirements: Vec<(usize, usize)>,
    scores: TimeScores,

    slot_ix: HashMap<Timeslot, usize>,
    group_ix: HashMap<String, usize>,
    subject_ix: HashMap<String, usize>,
    lecturer_ix: HashMap<String, usize>,
    classroom_ix: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(inst: &Instance) -> Result<Self, ValidationError> {
        validate(inst)?;

        let mut times = inst.times.clone();
        times.sort();
        let mut lecturers = inst.lectors.clone();
        lecturers.sort_by(|a, b| a.name.cmp(&b.name));
        let mut classrooms = inst.classrooms.clone();
        classrooms.sort_by(|a, b| a.name.cmp(&b.name));
        let subjects = inst.subjects.clone();
        let groups = inst.groups.clone();

        let slot_ix: HashMap<Timeslot, usize> =
            times.iter().enumerate().map(|(i, t)| (*t, i)).collect();
        let subject_ix: HashMap<String, usize> = subjects
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.0.clone(), i))
            .collect();
        let group_ix: HashMap<String, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.title.0.clone(), i))
            .collect();
        let lecturer_ix: HashMap<String, usize> = lecturers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name.0.clone(), i))
            .collect();
        let classroom_ix: HashMap<String, usize> = classrooms
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.0.clone(), i))
            .collect();

        let qualified: Vec<Vec<usize>> = subjects
            .iter()
            .map(|s| {
                lecturers
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| l.can_teach.contains(&s.name))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();
        let roomy: Vec<Vec<usize>> = groups
            .iter()
            .map(|g| {
                classrooms
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.max_student_count >= g.student_count)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        let mut requirements = Vec::with_capacity(inst.required_sessions());
        for (gi, g) in groups.iter().enumerate() {
            for name in &g.subject_names {
                let Some(&si) = subject_ix.get(name.as_str()) else {
                    continue;
                };
                for _ in 0..subjects[si].hours {
                    requirements.push((gi, si));
                }
            }
        }

        let scores = TimeScores((0..times.len()).map(|i| i as f64).collect());

        Ok(Self {
            times,
            subjects,
            groups,
            lecturers,
            classrooms,
            qualified,
            roomy,
            requirements,
            scores,
            slot_ix,
            group_ix,
            subject_ix,
            lecturer_ix,
            classroom_ix,
        })
    }

    pub fn times(&self) -> &[Timeslot] {
        &self.times
    }
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }
    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }
    pub fn scores(&self) -> &TimeScores {
        &self.scores
    }

    /// One `(group, subject)` entry per required session, group by group in
    /// input order. Every schedule built from this catalog has this layout.
    pub fn requirements(&self) -> &[(usize, usize)] {
        &self.requirements
    }

    /// Lecturers able to teach `subject`, ordered by name.
    pub fn qualified_lecturers(&self, subject: usize) -> &[usize] {
        &self.qualified[subject]
    }

    /// Classrooms large enough for `group`, ordered by name.
    pub fn fitting_classrooms(&self, group: usize) -> &[usize] {
        &self.roomy[group]
    }

    pub fn slot_of(&self, t: &Timeslot) -> Option<usize> {
        self.slot_ix.get(t).copied()
    }

    /// Resolves a named session row back into an index-based assignment.
    pub fn resolve_row(&self, row: &SessionRow) -> Result<Assignment, ValidationError> {
        let lookup = |map: &HashMap<String, usize>, kind: &str, name: &str| {
            map.get(name)
                .copied()
                .ok_or_else(|| ValidationError::new(format!("unknown {kind} {name}")))
        };
        let group = lookup(&self.group_ix, "group", row.group.as_str())?;
        let subject = lookup(&self.subject_ix, "subject", row.subject.as_str())?;
        let lecturer = lookup(&self.lecturer_ix, "lector", row.lecturer.as_str())?;
        let classroom = lookup(&self.classroom_ix, "classroom", row.classroom.as_str())?;
        let ts = Timeslot {
            day: row.day,
            period: row.period,
        };
        let slot = self
            .slot_of(&ts)
            .ok_or_else(|| ValidationError::new(format!("unknown timeslot {ts}")))?;
        Ok(Assignment {
            group,
            subject,
            lecturer: Some(lecturer),
            classroom: Some(classroom),
            slot: Some(slot),
        })
    }

    pub fn row_for(&self, a: &Assignment) -> Option<SessionRow> {
        let (lecturer, classroom, slot) = (a.lecturer?, a.classroom?, a.slot?);
        let ts = self.times[slot];
        Some(SessionRow {
            group: self.groups[a.group].title.clone(),
            subject: self.subjects[a.subject].name.clone(),
            lecturer: self.lecturers[lecturer].name.clone(),
            classroom: self.classrooms[classroom].name.clone(),
            day: ts.day,
            period: ts.period,
        })
    }
}
