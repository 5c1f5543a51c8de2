//! Coordinate-wise local search.
//!
//! Hill-climbs one free coordinate at a time (±step) and stops when a
//! full sweep finds no improving single-coordinate move, or the sweep
//! bound is hit. Deterministic: no randomness in this phase.

use crate::optimize::candidate::{Candidate, FREE_COORDS};
use crate::optimize::optimizer::{FitnessContext, ProgressSink, SearchPhase};

/// Acceptance margin; moves must beat the incumbent by more than noise.
const IMPROVEMENT_MARGIN: f64 = 1e-9;

/// Local search tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSearchConfig {
    pub step: f64,
    pub max_sweeps: u32,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            step: 2.5,
            max_sweeps: 6,
        }
    }
}

/// Refine `start` until no single-coordinate perturbation improves it.
pub fn descend(
    start: &Candidate,
    ctx: &mut FitnessContext<'_>,
    config: &LocalSearchConfig,
    sink: &mut dyn ProgressSink,
) -> Candidate {
    let Some(start_sample) = ctx.evaluate(start) else {
        return *start;
    };
    let mut current = (*start, start_sample);

    for sweep in 0..config.max_sweeps {
        if ctx.exhausted() {
            break;
        }
        let mut improved = false;
        for coord in 0..FREE_COORDS {
            for delta in [config.step, -config.step] {
                let mut trial = current.0;
                trial.set_coord(coord, trial.coord(coord) + delta);
                if trial == current.0 {
                    continue;
                }
                let Some(sample) = ctx.evaluate(&trial) else {
                    return current.0;
                };
                if sample.penalty < current.1.penalty - IMPROVEMENT_MARGIN {
                    current = (trial, sample);
                    improved = true;
                    break;
                }
            }
        }
        sink.report(SearchPhase::LocalSearch, sweep + 1, config.max_sweeps);
        if !improved {
            break;
        }
    }

    tracing::debug!(
        "LocalSearchDone penalty={:.4} evaluations={}",
        current.1.penalty,
        ctx.evaluations()
    );
    current.0
}
