use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use sched_core::scoring::{compute_soft_scores, Scores};
use sched_core::{validate_params, Catalog, GaParams, Schedule, SolveError};
use serde::Serialize;
use tracing::{debug, info};

use crate::availability::Availability;
use crate::init::build_individual;
use crate::operators::{crossover, mutate};

const PHASE_INIT: u64 = 1;
const PHASE_BREED: u64 = 2;

/// Independent random stream for one unit of work. Every individual slot of
/// every generation draws from its own stream, so results do not depend on
/// how rayon schedules the work.
pub(crate) fn stream_rng(seed: u64, phase: u64, generation: u64, slot: u64) -> ChaCha8Rng {
    let s = seed
        ^ phase.wrapping_mul(0xD6E8_FEB8_6659_FD93)
        ^ generation.rotate_left(29).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (slot.rotate_left(17)) ^ 0x9E37_79B1_85EB_CA87u64;
    ChaCha8Rng::seed_from_u64(s)
}

/// A schedule together with its evaluated scores.
#[derive(Clone, Debug)]
pub struct Individual {
    pub schedule: Schedule,
    pub scores: Scores,
    pub fitness: f64,
}

impl Individual {
    pub fn evaluate(catalog: &Catalog, params: &GaParams, schedule: Schedule) -> Self {
        let scores = compute_soft_scores(catalog, &schedule, &params.weights);
        let fitness = scores.fitness();
        Self {
            schedule,
            scores,
            fitness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Stagnated,
    GenerationLimit,
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub best: Individual,
    pub generations: u32,
    pub stop_reason: StopReason,
    /// Best fitness of the initial population followed by one entry per generation.
    pub best_per_generation: Vec<f64>,
    pub init_restarts: u64,
    pub discarded_children: u64,
}

/// Picks the fittest of `k` individuals drawn uniformly with replacement.
/// Ties go to the earliest draw.
pub fn tournament<'p, R: Rng + ?Sized>(
    population: &'p [Individual],
    k: usize,
    rng: &mut R,
) -> &'p Individual {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..k {
        let c = &population[rng.gen_range(0..population.len())];
        if c.fitness > best.fitness {
            best = c;
        }
    }
    best
}

/// Index of the first individual with maximal fitness.
fn fittest(population: &[Individual]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness > population[best].fitness {
            best = i;
        }
    }
    best
}

pub struct GeneticSearch<'a> {
    catalog: &'a Catalog,
    params: &'a GaParams,
}

impl<'a> GeneticSearch<'a> {
    pub fn new(catalog: &'a Catalog, params: &'a GaParams) -> Self {
        Self { catalog, params }
    }

    pub fn initial_population(&self) -> Result<(Vec<Individual>, u64), SolveError> {
        let av = Availability::new(self.catalog);
        let p = self.params;
        let built: Vec<(Schedule, u32)> = (0..p.population_size)
            .into_par_iter()
            .map(|i| {
                let mut rng = stream_rng(p.seed, PHASE_INIT, 0, i as u64);
                build_individual(&av, p.warmup_mutations, p.max_init_attempts, &mut rng)
            })
            .collect::<Result<_, _>>()?;

        let restarts = built.iter().map(|(_, r)| u64::from(*r)).sum();
        let population = built
            .into_par_iter()
            .map(|(s, _)| Individual::evaluate(self.catalog, p, s))
            .collect();
        Ok((population, restarts))
    }

    /// One child from two tournament winners, or `None` if it is invalid.
    fn breed<R: Rng + ?Sized>(
        &self,
        av: &Availability<'_>,
        population: &[Individual],
        rng: &mut R,
    ) -> Option<Individual> {
        let p = self.params;
        let a = tournament(population, p.tournament_size, rng);
        let b = tournament(population, p.tournament_size, rng);
        let mut child = crossover(&a.schedule, &b.schedule, rng);
        if rng.gen_bool(p.mutation_probability) {
            if let Some(m) = mutate(av, &child, rng) {
                child = m;
            }
        }
        child
            .is_valid()
            .then(|| Individual::evaluate(self.catalog, p, child))
    }

    /// Builds the next generation: elites first, then valid children in
    /// slot order. Returns it with the number of discarded children.
    pub fn next_generation(
        &self,
        population: &[Individual],
        generation: u32,
    ) -> (Vec<Individual>, u64) {
        let p = self.params;
        let av = Availability::new(self.catalog);

        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&x, &y| population[y].fitness.total_cmp(&population[x].fitness));
        let mut next: Vec<Individual> = order
            .iter()
            .take(p.elitism)
            .map(|&i| population[i].clone())
            .collect();

        let mut discarded = 0u64;
        let mut slot = 0usize;
        while next.len() < p.population_size {
            let need = p.population_size - next.len();
            let batch: Vec<Option<Individual>> = (slot..slot + need)
                .into_par_iter()
                .map(|j| {
                    let mut rng = stream_rng(p.seed, PHASE_BREED, u64::from(generation), j as u64);
                    self.breed(&av, population, &mut rng)
                })
                .collect();
            slot += need;
            for child in batch {
                match child {
                    Some(c) => next.push(c),
                    None => discarded += 1,
                }
            }
        }
        (next, discarded)
    }

    /// Fails with [`SolveError::Invalid`] on unusable parameters before any
    /// work starts.
    pub fn run(&self) -> Result<SearchOutcome, SolveError> {
        let p = self.params;
        validate_params(p)?;
        info!(
            population = p.population_size,
            sessions = self.catalog.requirements().len(),
            seed = p.seed,
            "starting genetic search"
        );

        let (mut population, init_restarts) = self.initial_population()?;
        let mut best_per_generation = vec![population[fittest(&population)].fitness];

        let mut curr_best = 0.0f64;
        let mut same_best = 0u32;
        let mut generations = 0u32;
        let mut discarded_children = 0u64;

        while generations < p.max_generations && same_best < p.stagnation_limit {
            let (next, discarded) = self.next_generation(&population, generations);
            population = next;
            discarded_children += discarded;
            generations += 1;

            let best = population[fittest(&population)].fitness;
            best_per_generation.push(best);
            if best > curr_best {
                curr_best = best;
                same_best = 0;
            } else if best == curr_best {
                same_best += 1;
            }
            debug!(generation = generations, best, same_best, discarded, "generation done");
        }

        let stop_reason = if same_best >= p.stagnation_limit {
            StopReason::Stagnated
        } else {
            StopReason::GenerationLimit
        };
        let best = population.swap_remove(fittest(&population));
        info!(
            generations,
            ?stop_reason,
            fitness = best.fitness,
            objective = best.scores.objective,
            "genetic search finished"
        );

        Ok(SearchOutcome {
            best,
            generations,
            stop_reason,
            best_per_generation,
            init_restarts,
            discarded_children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, rng, small_params};

    #[test]
    fn stream_rngs_differ_per_slot_and_generation() {
        let a: u64 = stream_rng(1, PHASE_BREED, 0, 0).gen();
        let b: u64 = stream_rng(1, PHASE_BREED, 0, 1).gen();
        let c: u64 = stream_rng(1, PHASE_BREED, 1, 0).gen();
        let d: u64 = stream_rng(1, PHASE_INIT, 0, 0).gen();
        let again: u64 = stream_rng(1, PHASE_BREED, 0, 0).gen();
        assert_eq!(a, again);
        assert!(a != b && a != c && a != d);
    }

    #[test]
    fn tournament_prefers_fitter_individuals() {
        let cat = catalog();
        let params = small_params(0);
        let search = GeneticSearch::new(&cat, &params);
        let (mut pop, _) = search.initial_population().unwrap();
        for (i, ind) in pop.iter_mut().enumerate() {
            ind.fitness = i as f64;
        }
        let mut r = rng(9);
        let winner = tournament(&pop, pop.len() * 50, &mut r);
        assert_eq!(winner.fitness, (pop.len() - 1) as f64);
        let single = tournament(&pop, 1, &mut r);
        assert!(single.fitness >= 0.0);
    }

    #[test]
    fn run_returns_valid_complete_schedule() {
        let cat = catalog();
        let params = small_params(17);
        let out = GeneticSearch::new(&cat, &params).run().unwrap();
        assert!(out.best.schedule.is_valid());
        assert!(out.best.schedule.is_complete());
        assert!(out.generations <= params.max_generations);
        assert_eq!(out.best_per_generation.len(), out.generations as usize + 1);
        let last = *out.best_per_generation.last().unwrap();
        assert_eq!(out.best.fitness, last);
    }

    #[test]
    fn best_fitness_never_regresses_with_elitism() {
        let cat = catalog();
        for seed in 0..4 {
            let params = small_params(seed);
            let out = GeneticSearch::new(&cat, &params).run().unwrap();
            for w in out.best_per_generation.windows(2) {
                assert!(w[1] >= w[0], "seed {seed}: {:?}", out.best_per_generation);
            }
        }
    }

    #[test]
    fn stagnation_stops_early() {
        let cat = catalog();
        let mut params = small_params(4);
        params.max_generations = 1000;
        params.stagnation_limit = 3;
        let out = GeneticSearch::new(&cat, &params).run().unwrap();
        assert_eq!(out.stop_reason, StopReason::Stagnated);
        assert!(out.generations < 1000);
    }

    #[test]
    fn generation_limit_is_respected() {
        let cat = catalog();
        let mut params = small_params(4);
        params.max_generations = 2;
        params.stagnation_limit = 100;
        let out = GeneticSearch::new(&cat, &params).run().unwrap();
        assert_eq!(out.generations, 2);
        assert_eq!(out.stop_reason, StopReason::GenerationLimit);
    }

    #[test]
    fn empty_population_is_rejected_not_indexed() {
        let cat = catalog();
        let mut params = small_params(1);
        params.population_size = 0;
        params.elitism = 0;
        let err = GeneticSearch::new(&cat, &params).run().unwrap_err();
        match err {
            SolveError::Invalid(e) => {
                assert_eq!(e.errors(), vec!["population_size must be positive".to_string()])
            }
            other => panic!("unexpected {other:?}"),
        }

        params.population_size = 6;
        params.tournament_size = 0;
        assert!(matches!(
            GeneticSearch::new(&cat, &params).run(),
            Err(SolveError::Invalid(_))
        ));
    }

    #[test]
    fn same_seed_same_result() {
        let cat = catalog();
        let params = small_params(23);
        let a = GeneticSearch::new(&cat, &params).run().unwrap();
        let b = GeneticSearch::new(&cat, &params).run().unwrap();
        assert_eq!(a.best.schedule, b.best.schedule);
        assert_eq!(a.best_per_generation, b.best_per_generation);
        assert_eq!(a.generations, b.generations);
    }
}
