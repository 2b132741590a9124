use rand::seq::SliceRandom;
use rand::Rng;
use sched_core::{Binding, Schedule, SolveError};
use tracing::{debug, warn};

use crate::availability::Availability;
use crate::operators::mutate;

/// One initialization attempt: warm up an empty schedule with
/// `warmup_mutations` mutation attempts, then bind whatever is still unset,
/// classroom first, then lecturer, then timeslot.
///
/// Returns `None` as soon as some binding has no legal value.
pub fn random_schedule<R: Rng + ?Sized>(
    availability: &Availability<'_>,
    warmup_mutations: u32,
    rng: &mut R,
) -> Option<Schedule> {
    let mut schedule = Schedule::empty(availability.catalog());
    for _ in 0..warmup_mutations {
        if let Some(next) = mutate(availability, &schedule, rng) {
            schedule = next;
        }
    }

    for index in 0..schedule.len() {
        for binding in Binding::ALL {
            if schedule.assignments()[index].binding(binding).is_some() {
                continue;
            }
            let candidates = availability.candidates(&schedule, index, binding);
            let &value = candidates.choose(rng)?;
            schedule = schedule.rebind(index, binding, value);
        }
    }

    (schedule.is_complete() && schedule.is_valid()).then_some(schedule)
}

/// Repeats [`random_schedule`] until it succeeds, at most `max_attempts`
/// times. Returns the schedule together with the number of failed attempts.
pub fn build_individual<R: Rng + ?Sized>(
    availability: &Availability<'_>,
    warmup_mutations: u32,
    max_attempts: u32,
    rng: &mut R,
) -> Result<(Schedule, u32), SolveError> {
    for attempt in 0..max_attempts {
        if let Some(s) = random_schedule(availability, warmup_mutations, rng) {
            return Ok((s, attempt));
        }
        debug!(attempt, "initialization attempt failed, restarting");
    }
    warn!(max_attempts, "initialization restart ceiling reached");
    Err(SolveError::Infeasible {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, rng, two_groups_one_slot_instance};
    use sched_core::Catalog;

    #[test]
    fn built_schedules_are_complete_and_valid() {
        let cat = catalog();
        let av = Availability::new(&cat);
        let mut r = rng(42);
        for _ in 0..20 {
            let (s, _) = build_individual(&av, 1000, 1000, &mut r).unwrap();
            assert!(s.is_complete());
            assert!(s.is_valid());
            assert_eq!(s.len(), cat.requirements().len());
        }
    }

    #[test]
    fn warmup_is_optional() {
        let cat = catalog();
        let av = Availability::new(&cat);
        let (s, _) = build_individual(&av, 0, 1000, &mut rng(5)).unwrap();
        assert!(s.is_complete() && s.is_valid());
    }

    #[test]
    fn over_constrained_instance_hits_the_ceiling() {
        let cat = Catalog::new(&two_groups_one_slot_instance()).unwrap();
        let av = Availability::new(&cat);
        let err = build_individual(&av, 50, 25, &mut rng(1)).unwrap_err();
        assert!(matches!(err, SolveError::Infeasible { attempts: 25 }));
    }
}
