use rand::seq::SliceRandom;
use rand::Rng;
use sched_core::{Binding, Schedule};

use crate::availability::Availability;

/// Rebinds one binding of one uniformly chosen assignment to a uniformly
/// chosen legal alternative.
///
/// Returns `None` when the drawn binding has no legal alternative; the input
/// is left as it was and the caller keeps using it. Otherwise the returned
/// schedule differs from `schedule` at exactly one assignment.
pub fn mutate<R: Rng + ?Sized>(
    availability: &Availability<'_>,
    schedule: &Schedule,
    rng: &mut R,
) -> Option<Schedule> {
    if schedule.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..schedule.len());
    let binding = *Binding::ALL.choose(rng)?;
    let candidates = availability.candidates(schedule, index, binding);
    let value = *candidates.choose(rng)?;
    Some(schedule.clone().rebind(index, binding, value))
}

/// Uniform per-assignment recombination. The child may be invalid.
pub fn crossover<R: Rng + ?Sized>(a: &Schedule, b: &Schedule, rng: &mut R) -> Schedule {
    a.crossover(b, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{build_individual, random_schedule};
    use crate::test_support::{catalog, rng};
    use proptest::prelude::*;
    use sched_core::{Assignment, Catalog};

    #[test]
    fn mutation_changes_exactly_one_assignment() {
        let cat = catalog();
        let av = Availability::new(&cat);
        let mut r = rng(3);
        let (base, _) = build_individual(&av, 200, 1000, &mut r).unwrap();
        let mut changed = 0;
        for _ in 0..200 {
            if let Some(next) = mutate(&av, &base, &mut r) {
                changed += 1;
                let diffs = base
                    .assignments()
                    .iter()
                    .zip(next.assignments())
                    .filter(|(a, b)| a != b)
                    .count();
                assert_eq!(diffs, 1);
                assert!(next.is_valid());
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn mutation_without_alternatives_is_a_no_op() {
        let inst = crate::test_support::single_slot_instance();
        let cat = Catalog::new(&inst).unwrap();
        let av = Availability::new(&cat);
        let only = Schedule::from_assignments(vec![Assignment {
            lecturer: Some(0),
            classroom: Some(0),
            slot: Some(0),
            ..Assignment::new(0, 0)
        }]);
        let mut r = rng(11);
        for _ in 0..50 {
            assert!(mutate(&av, &only, &mut r).is_none());
        }
    }

    #[test]
    fn empty_schedule_cannot_mutate() {
        let cat = catalog();
        let av = Availability::new(&cat);
        let s = Schedule::from_assignments(vec![]);
        assert!(mutate(&av, &s, &mut rng(0)).is_none());
    }

    proptest! {
        #[test]
        fn operators_keep_length_and_pairing(seed in any::<u64>()) {
            let cat = catalog();
            let av = Availability::new(&cat);
            let mut r = rng(seed);
            let a = random_schedule(&av, 100, &mut r);
            let b = random_schedule(&av, 100, &mut r);
            if let (Some(a), Some(b)) = (a, b) {
                let child = crossover(&a, &b, &mut r);
                let mutated = mutate(&av, &a, &mut r).unwrap_or_else(|| a.clone());
                for s in [&child, &mutated] {
                    prop_assert_eq!(s.len(), cat.requirements().len());
                    for (x, &(g, subj)) in s.assignments().iter().zip(cat.requirements()) {
                        prop_assert_eq!((x.group, x.subject), (g, subj));
                    }
                }
            }
        }
    }
}
