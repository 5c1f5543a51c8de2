//! Simulated annealing phase.
//!
//! **Rule:**
//! - Geometric cooling: `T ← T · cooling` each iteration.
//! - Metropolis acceptance: a worse neighbor is accepted with
//!   probability `exp(-Δ/T)`.
//! - Out-of-band neighbors get one budget repair before acceptance is
//!   decided.
//!
//! Returns the best candidate seen, by penalty, so a late random walk
//! cannot lose an earlier good point.

use crate::optimize::candidate::Candidate;
use crate::optimize::optimizer::{FitnessContext, ProgressSink, SearchPhase};
use crate::optimize::strategy::{RepairStrategy, repair_toward_budget};
use rand::Rng;
use rand::rngs::StdRng;

/// Coordinate shift magnitude for neighbor moves.
const NEIGHBOR_STEP: f64 = 12.0;

/// Annealing tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingConfig {
    pub iterations: u32,
    pub initial_temperature: f64,
    pub cooling: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            iterations: 160,
            initial_temperature: 8.0,
            cooling: 0.97,
        }
    }
}

/// Run the annealing phase from `start`.
pub fn anneal(
    start: &Candidate,
    ctx: &mut FitnessContext<'_>,
    config: &AnnealingConfig,
    strategy: RepairStrategy,
    rng: &mut StdRng,
    sink: &mut dyn ProgressSink,
) -> Candidate {
    let Some(start_sample) = ctx.evaluate(start) else {
        return *start;
    };
    let mut current = (*start, start_sample);
    let mut best = current;
    let mut temperature = config.initial_temperature.max(f64::MIN_POSITIVE);

    for iteration in 0..config.iterations {
        if ctx.exhausted() {
            break;
        }
        let mut neighbor = current.0.perturbed(rng, NEIGHBOR_STEP);
        let Some(mut sample) = ctx.evaluate(&neighbor) else {
            break;
        };
        if !sample.in_budget {
            let repaired =
                repair_toward_budget(&neighbor, sample.cost, ctx.target_budget(), strategy);
            if let Some(repaired_sample) = ctx.evaluate(&repaired) {
                if repaired_sample.penalty < sample.penalty {
                    neighbor = repaired;
                    sample = repaired_sample;
                }
            }
        }

        let delta = sample.penalty - current.1.penalty;
        let accept = delta < 0.0 || rng.gen_range(0.0..1.0) < (-delta / temperature).exp();
        if accept {
            current = (neighbor, sample);
            if sample.penalty < best.1.penalty {
                best = current;
            }
        }

        temperature *= config.cooling;
        sink.report(SearchPhase::Annealing, iteration + 1, config.iterations);
    }

    tracing::debug!(
        "AnnealingDone best_penalty={:.4} evaluations={}",
        best.1.penalty,
        ctx.evaluations()
    );
    best.0
}
