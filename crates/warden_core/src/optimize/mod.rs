//! Budget-constrained allocation search.
//!
//! The optimizer searches allocation space (channel percentages plus
//! response percentages, with the worker-voice channel linked across
//! both) for the lowest portfolio managed risk whose cost stays inside
//! the budget band. Three phases run per restart attempt: simulated
//! annealing, a genetic loop, and coordinate local search. Restarts cycle
//! through named budget-repair strategies.
//!
//! The deterministic fitness function lives in [`optimizer`] and is pure;
//! all randomness flows through one seeded `StdRng`, so a run is
//! reproducible from its seed.

pub mod annealing;
pub mod candidate;
pub mod genetic;
pub mod local_search;
pub mod optimizer;
pub mod state_hash;
pub mod strategy;

pub use annealing::AnnealingConfig;
pub use candidate::Candidate;
pub use genetic::GeneticConfig;
pub use local_search::LocalSearchConfig;
pub use optimizer::{
    NullProgress, OptimizationInput, OptimizationResult, OptimizationStatus, Optimizer,
    OptimizerConfig, OptimizerMetrics, ProgressSink, SearchPhase,
};
pub use state_hash::optimization_state_hash;
pub use strategy::RepairStrategy;
