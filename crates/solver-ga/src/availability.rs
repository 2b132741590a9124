use sched_core::{Binding, Catalog, Schedule};

/// Computes legal alternatives for one binding of one assignment, holding
/// its other bindings fixed and respecting every other booking in the
/// schedule.
///
/// Results are ascending catalog indices: classrooms and lecturers come out
/// ordered by name, timeslots by (day, period). The value currently bound is
/// never offered. An empty result means no legal alternative exists.
#[derive(Clone, Copy)]
pub struct Availability<'a> {
    catalog: &'a Catalog,
}

impl<'a> Availability<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn candidates(&self, schedule: &Schedule, index: usize, binding: Binding) -> Vec<usize> {
        match binding {
            Binding::Classroom => self.classrooms(schedule, index),
            Binding::Lecturer => self.lecturers(schedule, index),
            Binding::Timeslot => self.timeslots(schedule, index),
        }
    }

    /// Classrooms that fit the group and are free at the assignment's timeslot.
    pub fn classrooms(&self, schedule: &Schedule, index: usize) -> Vec<usize> {
        let target = schedule.assignments()[index];
        let mut busy = vec![false; self.catalog.classrooms().len()];
        if let Some(t) = target.slot {
            for (i, a) in schedule.assignments().iter().enumerate() {
                if i == index || a.slot != Some(t) {
                    continue;
                }
                if let Some(c) = a.classroom {
                    busy[c] = true;
                }
            }
        }
        if let Some(c) = target.classroom {
            busy[c] = true;
        }
        self.catalog
            .fitting_classrooms(target.group)
            .iter()
            .copied()
            .filter(|&c| !busy[c])
            .collect()
    }

    /// Lecturers qualified for the subject and free at the assignment's timeslot.
    pub fn lecturers(&self, schedule: &Schedule, index: usize) -> Vec<usize> {
        let target = schedule.assignments()[index];
        let mut busy = vec![false; self.catalog.lecturers().len()];
        if let Some(t) = target.slot {
            for (i, a) in schedule.assignments().iter().enumerate() {
                if i == index || a.slot != Some(t) {
                    continue;
                }
                if let Some(l) = a.lecturer {
                    busy[l] = true;
                }
            }
        }
        if let Some(l) = target.lecturer {
            busy[l] = true;
        }
        self.catalog
            .qualified_lecturers(target.subject)
            .iter()
            .copied()
            .filter(|&l| !busy[l])
            .collect()
    }

    /// Timeslots where the assignment's group, classroom and lecturer are all free.
    pub fn timeslots(&self, schedule: &Schedule, index: usize) -> Vec<usize> {
        let target = schedule.assignments()[index];
        let mut busy = vec![false; self.catalog.times().len()];
        for (i, a) in schedule.assignments().iter().enumerate() {
            if i == index {
                continue;
            }
            let Some(t) = a.slot else { continue };
            let clash = a.group == target.group
                || (target.classroom.is_some() && a.classroom == target.classroom)
                || (target.lecturer.is_some() && a.lecturer == target.lecturer);
            if clash {
                busy[t] = true;
            }
        }
        if let Some(t) = target.slot {
            busy[t] = true;
        }
        (0..busy.len()).filter(|&t| !busy[t]).collect()
    }
}
