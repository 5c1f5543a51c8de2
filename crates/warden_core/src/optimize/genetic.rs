//! Genetic phase: elitism, blend crossover, bounded mutation.
//!
//! The population seeds from the annealing result plus mutated variants.
//! Each generation keeps the elite front intact, fills the rest with
//! blended children of tournament-picked parents, and gives out-of-band
//! children one budget repair.

use crate::optimize::candidate::Candidate;
use crate::optimize::optimizer::{FitnessContext, FitnessSample, ProgressSink, SearchPhase};
use crate::optimize::strategy::{RepairStrategy, repair_toward_budget};
use rand::Rng;
use rand::rngs::StdRng;

/// Mutation magnitude used when spawning the initial population.
const SEED_SPREAD: f64 = 25.0;

/// Genetic loop tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticConfig {
    pub population: usize,
    pub generations: u32,
    pub elites: usize,
    pub mutation_probability: f64,
    pub mutation_scale: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population: 20,
            generations: 24,
            elites: 4,
            mutation_probability: 0.3,
            mutation_scale: 12.0,
        }
    }
}

fn sort_by_penalty(population: &mut [(Candidate, FitnessSample)]) {
    population.sort_by(|a, b| {
        a.1.penalty
            .partial_cmp(&b.1.penalty)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Tournament pick over a penalty-sorted population: two uniform draws,
/// keep the fitter (lower index).
fn pick(rng: &mut StdRng, len: usize) -> usize {
    let a = rng.gen_range(0..len);
    let b = rng.gen_range(0..len);
    a.min(b)
}

/// Run the genetic phase seeded from `seed`.
pub fn evolve(
    seed: &Candidate,
    ctx: &mut FitnessContext<'_>,
    config: &GeneticConfig,
    strategy: RepairStrategy,
    rng: &mut StdRng,
    sink: &mut dyn ProgressSink,
) -> Candidate {
    let population_size = config.population.max(2);
    let mut population: Vec<(Candidate, FitnessSample)> = Vec::with_capacity(population_size);

    if let Some(sample) = ctx.evaluate(seed) {
        population.push((*seed, sample));
    } else {
        return *seed;
    }
    while population.len() < population_size && !ctx.exhausted() {
        let variant = seed.mutated(rng, 0.5, SEED_SPREAD);
        let repaired = match ctx.evaluate(&variant) {
            Some(sample) if !sample.in_budget => {
                repair_toward_budget(&variant, sample.cost, ctx.target_budget(), strategy)
            }
            Some(_) => variant,
            None => break,
        };
        if let Some(sample) = ctx.evaluate(&repaired) {
            population.push((repaired, sample));
        } else {
            break;
        }
    }
    sort_by_penalty(&mut population);

    for generation in 0..config.generations {
        if ctx.exhausted() || population.len() < 2 {
            break;
        }
        // At least one elite survives, so the population can never empty
        // out even when the evaluation budget runs dry mid-generation.
        let elites = config.elites.clamp(1, population.len());
        let mut next: Vec<(Candidate, FitnessSample)> = population[..elites].to_vec();

        while next.len() < population_size && !ctx.exhausted() {
            let parent_a = population[pick(rng, population.len())].0;
            let parent_b = population[pick(rng, population.len())].0;
            let lambda = rng.gen_range(0.0..1.0);
            let mut child = Candidate::crossover(&parent_a, &parent_b, lambda).mutated(
                rng,
                config.mutation_probability,
                config.mutation_scale,
            );
            let Some(mut sample) = ctx.evaluate(&child) else {
                break;
            };
            if !sample.in_budget {
                let repaired =
                    repair_toward_budget(&child, sample.cost, ctx.target_budget(), strategy);
                if let Some(repaired_sample) = ctx.evaluate(&repaired) {
                    if repaired_sample.penalty < sample.penalty {
                        child = repaired;
                        sample = repaired_sample;
                    }
                } else {
                    next.push((child, sample));
                    break;
                }
            }
            next.push((child, sample));
        }

        population = next;
        sort_by_penalty(&mut population);
        sink.report(SearchPhase::Genetic, generation + 1, config.generations);
    }

    tracing::debug!(
        "GeneticDone best_penalty={:.4} evaluations={}",
        population[0].1.penalty,
        ctx.evaluations()
    );
    population[0].0
}
