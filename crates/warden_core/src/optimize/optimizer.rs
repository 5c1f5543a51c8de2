//! Optimization driver: restarts, phases, memoization cache.
//!
//! The driver owns the single-slot "last optimization" cache; callers
//! sharing one `Optimizer` across threads must serialize access to it.
//! The fitness function is deterministic; the only stochastic element is
//! the injected seed, so identical inputs plus identical seed reproduce a
//! run exactly. A parallel implementation could evaluate populations
//! concurrently and combine by minimum fitness; restart tie-breaking
//! would then become a documented nondeterminism point.

use crate::assessment::{AssessmentMetrics, ControlState, evaluate};
use crate::config::CostAssumptions;
use crate::optimize::annealing::{AnnealingConfig, anneal};
use crate::optimize::candidate::Candidate;
use crate::optimize::genetic::{GeneticConfig, evolve};
use crate::optimize::local_search::{LocalSearchConfig, descend};
use crate::optimize::state_hash::optimization_state_hash;
use crate::optimize::strategy::{STRATEGY_CYCLE, repair_toward_budget};
use crate::scoring::SelectedRegion;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Penalty weight for out-of-band candidates; large enough that no
/// in-band candidate ever loses to an out-of-band one.
const OUT_OF_BUDGET_PENALTY: f64 = 1000.0;

/// Hard ceiling on restart attempts.
const MAX_RESTART_ATTEMPTS: u32 = 5;

// ─── Progress side channel ──────────────────────────────────────────────

/// Search phase identifiers for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Annealing,
    Genetic,
    LocalSearch,
}

impl SearchPhase {
    /// Stable phase name for display.
    pub fn name(&self) -> &'static str {
        match self {
            SearchPhase::Annealing => "annealing",
            SearchPhase::Genetic => "genetic",
            SearchPhase::LocalSearch => "local-search",
        }
    }
}

/// Reporting sink for search progress. This is a side channel only: the
/// sink observes the search, it never affects results.
pub trait ProgressSink {
    fn report(&mut self, phase: SearchPhase, iteration: u32, total: u32);
}

/// Sink that discards all progress reports.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _phase: SearchPhase, _iteration: u32, _total: u32) {}
}

// ─── Fitness ────────────────────────────────────────────────────────────

/// One fitness evaluation of a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSample {
    /// Portfolio managed risk under the candidate.
    pub risk: f64,
    /// Total cost of the candidate.
    pub cost: f64,
    /// Whether the cost sits inside the budget band.
    pub in_budget: bool,
    /// Search objective: risk, plus a large penalty when out of band.
    pub penalty: f64,
}

/// Deterministic fitness function with an evaluation budget.
///
/// Separated from the stochastic search driver so the search can be
/// reproduced and the objective tested in isolation.
pub struct FitnessContext<'a> {
    state: &'a ControlState,
    selection: &'a [SelectedRegion],
    assumptions: &'a CostAssumptions,
    hourly_rate: f64,
    target_budget: f64,
    budget_tolerance: f64,
    max_evaluations: u32,
    evaluations: u32,
    assessment_metrics: AssessmentMetrics,
}

impl<'a> FitnessContext<'a> {
    fn new(input: &OptimizationInput<'a>, config: &OptimizerConfig) -> Self {
        Self {
            state: input.state,
            selection: input.selection,
            assumptions: input.assumptions,
            hourly_rate: input.hourly_rate,
            target_budget: config.target_budget,
            budget_tolerance: config.budget_tolerance,
            max_evaluations: config.max_fitness_evaluations,
            evaluations: 0,
            assessment_metrics: AssessmentMetrics::new(),
        }
    }

    /// Evaluations spent so far.
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }

    /// Whether the evaluation budget is spent.
    pub fn exhausted(&self) -> bool {
        self.evaluations >= self.max_evaluations
    }

    /// Target budget for repairs.
    pub fn target_budget(&self) -> f64 {
        self.target_budget
    }

    /// Evaluate one candidate, or `None` once the budget is spent.
    pub fn evaluate(&mut self, candidate: &Candidate) -> Option<FitnessSample> {
        if self.exhausted() {
            return None;
        }
        self.evaluations += 1;

        let probe = ControlState {
            focus: self.state.focus,
            tools: candidate.tools,
            responses: candidate.responses,
            assumed_tool_effectiveness: self.state.assumed_tool_effectiveness,
            assumed_response_effectiveness: self.state.assumed_response_effectiveness,
        };
        let assessment = evaluate(
            &probe,
            self.selection,
            self.assumptions,
            self.hourly_rate,
            &mut self.assessment_metrics,
        );

        let risk = assessment.managed.portfolio_managed_risk;
        let cost = assessment.total_cost;
        let gap = (cost - self.target_budget).abs();
        let in_budget = gap <= self.budget_tolerance;
        let penalty = if in_budget {
            risk
        } else {
            risk + OUT_OF_BUDGET_PENALTY * gap / self.target_budget.max(1.0)
        };
        Some(FitnessSample {
            risk,
            cost,
            in_budget,
            penalty,
        })
    }
}

// ─── Configuration ──────────────────────────────────────────────────────

/// Optimizer tuning. The seed makes runs reproducible; everything else
/// bounds the search effort.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Seed for the injected random source.
    pub seed: u64,
    /// Budget the allocation must land on.
    pub target_budget: f64,
    /// Half-width of the acceptable budget band.
    pub budget_tolerance: f64,
    /// Restart attempts (clamped to 5), cycling repair strategies.
    pub max_restarts: u32,
    /// Minimum risk improvement (score points) for a result to count.
    pub min_improvement: f64,
    /// Hard cap on fitness evaluations across all phases and restarts.
    pub max_fitness_evaluations: u32,
    pub annealing: AnnealingConfig,
    pub genetic: GeneticConfig,
    pub local_search: LocalSearchConfig,
}

impl OptimizerConfig {
    /// Default tuning for a given budget band.
    pub fn for_budget(target_budget: f64, budget_tolerance: f64) -> Self {
        Self {
            seed: 17,
            target_budget,
            budget_tolerance,
            max_restarts: 4,
            min_improvement: 0.1,
            max_fitness_evaluations: 4000,
            annealing: AnnealingConfig::default(),
            genetic: GeneticConfig::default(),
            local_search: LocalSearchConfig::default(),
        }
    }
}

/// Inputs the optimizer searches over.
#[derive(Debug, Clone)]
pub struct OptimizationInput<'a> {
    /// Current control state; its allocations are the starting point and
    /// the fallback result.
    pub state: &'a ControlState,
    /// Scored selection the fitness function assesses.
    pub selection: &'a [SelectedRegion],
    /// Cost assumptions.
    pub assumptions: &'a CostAssumptions,
    /// Hourly rate for internal hours.
    pub hourly_rate: f64,
}

// ─── Outcome ────────────────────────────────────────────────────────────

/// Terminal status of an optimization run. `NoImprovement` is an expected
/// outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// A valid, sufficiently-improving allocation was found.
    Improved,
    /// Inputs match the cached run; returning its result unchanged.
    AlreadyOptimized,
    /// The new run succeeded but did not strictly dominate the cached
    /// result, so the cached allocation is kept.
    RetainedPrevious,
    /// No valid, sufficiently-improving allocation within all attempts;
    /// the original allocation is returned unchanged.
    NoImprovement,
}

/// Result of one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub status: OptimizationStatus,
    /// Recommended (or retained) allocation.
    pub candidate: Candidate,
    /// Portfolio managed risk under the recommended allocation.
    pub projected_risk: f64,
    /// Cost of the recommended allocation.
    pub projected_cost: f64,
    /// Portfolio managed risk under the original allocation.
    pub current_risk: f64,
    /// Fitness evaluations spent by this run (0 on a cache hit).
    pub evaluations: u32,
}

#[derive(Debug, Clone)]
struct CachedOptimization {
    state_hash: u64,
    result: OptimizationResult,
}

// ─── Metrics ────────────────────────────────────────────────────────────

/// Observability counters for the optimizer.
#[derive(Debug, Default)]
pub struct OptimizerMetrics {
    runs_total: u64,
    cache_hits_total: u64,
    restarts_total: u64,
    evaluations_total: u64,
    no_improvement_total: u64,
    retained_previous_total: u64,
}

impl OptimizerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs_total(&self) -> u64 {
        self.runs_total
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total
    }

    pub fn restarts_total(&self) -> u64 {
        self.restarts_total
    }

    pub fn evaluations_total(&self) -> u64 {
        self.evaluations_total
    }

    pub fn no_improvement_total(&self) -> u64 {
        self.no_improvement_total
    }

    pub fn retained_previous_total(&self) -> u64 {
        self.retained_previous_total
    }
}

// ─── Driver ─────────────────────────────────────────────────────────────

/// Allocation optimizer owning the single-slot memoization cache.
#[derive(Debug, Default)]
pub struct Optimizer {
    cache: Option<CachedOptimization>,
}

impl Optimizer {
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Search allocation space for the lowest managed risk inside the
    /// budget band.
    pub fn optimize(
        &mut self,
        input: &OptimizationInput<'_>,
        config: &OptimizerConfig,
        metrics: &mut OptimizerMetrics,
        sink: &mut dyn ProgressSink,
    ) -> OptimizationResult {
        metrics.runs_total += 1;

        let state_hash = optimization_state_hash(
            input.state,
            input.selection,
            input.assumptions,
            input.hourly_rate,
            config.target_budget,
            config.budget_tolerance,
        );
        if let Some(cached) = &self.cache {
            if cached.state_hash == state_hash {
                metrics.cache_hits_total += 1;
                tracing::debug!("OptimizerCacheHit state_hash={state_hash:016x}");
                let mut result = cached.result.clone();
                result.status = OptimizationStatus::AlreadyOptimized;
                result.evaluations = 0;
                return result;
            }
        }

        let mut ctx = FitnessContext::new(input, config);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let original = Candidate::new(input.state.tools, input.state.responses);
        let baseline = ctx.evaluate(&original);
        let (current_risk, current_cost) = match baseline {
            Some(sample) => (sample.risk, sample.cost),
            None => (0.0, 0.0),
        };

        let mut best: Option<(Candidate, FitnessSample)> = None;
        let attempts = config.max_restarts.clamp(1, MAX_RESTART_ATTEMPTS);
        for attempt in 0..attempts {
            if ctx.exhausted() {
                break;
            }
            metrics.restarts_total += 1;
            let strategy = STRATEGY_CYCLE[attempt as usize % STRATEGY_CYCLE.len()];
            tracing::debug!(
                "OptimizerRestart attempt={} strategy={}",
                attempt,
                strategy.name()
            );

            let start =
                repair_toward_budget(&original, current_cost, config.target_budget, strategy);

            let annealed = anneal(&start, &mut ctx, &config.annealing, strategy, &mut rng, sink);
            let evolved = evolve(&annealed, &mut ctx, &config.genetic, strategy, &mut rng, sink);
            let refined = descend(&evolved, &mut ctx, &config.local_search, sink);

            if let Some(sample) = ctx.evaluate(&refined) {
                let qualifies = sample.in_budget
                    && sample.risk <= current_risk - config.min_improvement;
                let better = match &best {
                    Some((_, incumbent)) => sample.penalty < incumbent.penalty,
                    None => true,
                };
                if qualifies && better {
                    best = Some((refined, sample));
                }
            }
        }

        metrics.evaluations_total += u64::from(ctx.evaluations());

        let result = match best {
            Some((candidate, sample)) => {
                let improved = OptimizationResult {
                    status: OptimizationStatus::Improved,
                    candidate,
                    projected_risk: sample.risk,
                    projected_cost: sample.cost,
                    current_risk,
                    evaluations: ctx.evaluations(),
                };
                self.accept_or_retain(improved, state_hash, metrics)
            }
            None => {
                metrics.no_improvement_total += 1;
                let result = OptimizationResult {
                    status: OptimizationStatus::NoImprovement,
                    candidate: original,
                    projected_risk: current_risk,
                    projected_cost: current_cost,
                    current_risk,
                    evaluations: ctx.evaluations(),
                };
                self.cache = Some(CachedOptimization {
                    state_hash,
                    result: result.clone(),
                });
                result
            }
        };
        result
    }

    /// Accept a fresh success only if it strictly dominates the cached
    /// result: lower cost at same-or-better risk, or lower risk at
    /// same-or-lower cost. Otherwise keep the cached allocation.
    fn accept_or_retain(
        &mut self,
        improved: OptimizationResult,
        state_hash: u64,
        metrics: &mut OptimizerMetrics,
    ) -> OptimizationResult {
        let dominated_cache = match &self.cache {
            Some(cached) if cached.result.status != OptimizationStatus::NoImprovement => {
                let prior = &cached.result;
                let dominates = (improved.projected_risk < prior.projected_risk
                    && improved.projected_cost <= prior.projected_cost)
                    || (improved.projected_risk <= prior.projected_risk
                        && improved.projected_cost < prior.projected_cost);
                if dominates {
                    None
                } else {
                    Some(prior.clone())
                }
            }
            _ => None,
        };

        match dominated_cache {
            Some(prior) => {
                metrics.retained_previous_total += 1;
                tracing::debug!(
                    "OptimizerRetainedPrevious new_risk={:.3} new_cost={:.1} prior_risk={:.3} prior_cost={:.1}",
                    improved.projected_risk,
                    improved.projected_cost,
                    prior.projected_risk,
                    prior.projected_cost
                );
                let retained = OptimizationResult {
                    status: OptimizationStatus::RetainedPrevious,
                    candidate: prior.candidate,
                    projected_risk: prior.projected_risk,
                    projected_cost: prior.projected_cost,
                    current_risk: improved.current_risk,
                    evaluations: improved.evaluations,
                };
                self.cache = Some(CachedOptimization {
                    state_hash,
                    result: retained.clone(),
                });
                retained
            }
            None => {
                self.cache = Some(CachedOptimization {
                    state_hash,
                    result: improved.clone(),
                });
                improved
            }
        }
    }
}
