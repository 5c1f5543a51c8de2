//! Engine parameter profiles with fail-closed resolution.
//!
//! A profile is a JSON document carrying the caller's weights,
//! allocations, assumed effectiveness, and cost assumptions. Tunable
//! scalars resolve in precedence order: explicit profile value, then the
//! built-in default. A parameter with no default (the target budget) must
//! be explicit or resolution fails closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use warden_core::assessment::ControlState;
use warden_core::config::{
    ConfigError, CostAssumptions, NUM_INDICATORS, NUM_RESPONSES, NUM_TOOLS, ResponseAllocation,
    ToolAllocation, WeightVector,
};
use warden_core::optimize::{AnnealingConfig, GeneticConfig, LocalSearchConfig, OptimizerConfig};

// ─── Parameter table ────────────────────────────────────────────────────

/// Tunable scalar parameters with built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileParam {
    HourlyRate,
    TargetBudget,
    BudgetToleranceRatio,
    Focus,
    OptimizerSeed,
    MaxRestarts,
    MinImprovement,
    MaxFitnessEvaluations,
    AnnealingIterations,
    AnnealingInitialTemperature,
    AnnealingCooling,
    GeneticPopulation,
    GeneticGenerations,
    GeneticElites,
    GeneticMutationProbability,
    GeneticMutationScale,
    LocalSearchStep,
    LocalSearchMaxSweeps,
}

/// Error when a required parameter is missing or invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingParamError {
    pub param_name: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for MissingParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "profile fail-closed: '{}' {}",
            self.param_name, self.reason
        )
    }
}

impl std::error::Error for MissingParamError {}

/// Returns the built-in default for a parameter, or `None` if the
/// parameter must be explicit.
pub fn default_param(param: ProfileParam) -> Option<f64> {
    match param {
        ProfileParam::HourlyRate => Some(95.0),
        ProfileParam::TargetBudget => None,
        ProfileParam::BudgetToleranceRatio => Some(0.10),
        ProfileParam::Focus => Some(0.5),
        ProfileParam::OptimizerSeed => Some(17.0),
        ProfileParam::MaxRestarts => Some(4.0),
        ProfileParam::MinImprovement => Some(0.1),
        ProfileParam::MaxFitnessEvaluations => Some(4000.0),
        ProfileParam::AnnealingIterations => Some(160.0),
        ProfileParam::AnnealingInitialTemperature => Some(8.0),
        ProfileParam::AnnealingCooling => Some(0.97),
        ProfileParam::GeneticPopulation => Some(20.0),
        ProfileParam::GeneticGenerations => Some(24.0),
        ProfileParam::GeneticElites => Some(4.0),
        ProfileParam::GeneticMutationProbability => Some(0.3),
        ProfileParam::GeneticMutationScale => Some(12.0),
        ProfileParam::LocalSearchStep => Some(2.5),
        ProfileParam::LocalSearchMaxSweeps => Some(6.0),
    }
}

/// Returns the snake_case name for a parameter (matches profile JSON keys).
pub fn param_name(param: ProfileParam) -> &'static str {
    match param {
        ProfileParam::HourlyRate => "hourly_rate",
        ProfileParam::TargetBudget => "target_budget",
        ProfileParam::BudgetToleranceRatio => "budget_tolerance_ratio",
        ProfileParam::Focus => "focus",
        ProfileParam::OptimizerSeed => "optimizer_seed",
        ProfileParam::MaxRestarts => "max_restarts",
        ProfileParam::MinImprovement => "min_improvement",
        ProfileParam::MaxFitnessEvaluations => "max_fitness_evaluations",
        ProfileParam::AnnealingIterations => "annealing_iterations",
        ProfileParam::AnnealingInitialTemperature => "annealing_initial_temperature",
        ProfileParam::AnnealingCooling => "annealing_cooling",
        ProfileParam::GeneticPopulation => "genetic_population",
        ProfileParam::GeneticGenerations => "genetic_generations",
        ProfileParam::GeneticElites => "genetic_elites",
        ProfileParam::GeneticMutationProbability => "genetic_mutation_probability",
        ProfileParam::GeneticMutationScale => "genetic_mutation_scale",
        ProfileParam::LocalSearchStep => "local_search_step",
        ProfileParam::LocalSearchMaxSweeps => "local_search_max_sweeps",
    }
}

/// Expected number of ProfileParam variants; bump when adding variants so
/// the completeness test catches a missing ALL_PARAMS entry.
pub const EXPECTED_PARAM_COUNT: usize = 18;

/// All known `ProfileParam` variants (for exhaustive iteration in tests).
pub const ALL_PARAMS: &[ProfileParam] = &[
    ProfileParam::HourlyRate,
    ProfileParam::TargetBudget,
    ProfileParam::BudgetToleranceRatio,
    ProfileParam::Focus,
    ProfileParam::OptimizerSeed,
    ProfileParam::MaxRestarts,
    ProfileParam::MinImprovement,
    ProfileParam::MaxFitnessEvaluations,
    ProfileParam::AnnealingIterations,
    ProfileParam::AnnealingInitialTemperature,
    ProfileParam::AnnealingCooling,
    ProfileParam::GeneticPopulation,
    ProfileParam::GeneticGenerations,
    ProfileParam::GeneticElites,
    ProfileParam::GeneticMutationProbability,
    ProfileParam::GeneticMutationScale,
    ProfileParam::LocalSearchStep,
    ProfileParam::LocalSearchMaxSweeps,
];

/// Resolve a parameter with fail-closed semantics.
///
/// - `Some(v)`: v wins if finite and non-negative; otherwise fail-closed.
/// - `None`: the built-in default applies, or the resolution fails closed
///   when no default exists.
pub fn resolve_param(param: ProfileParam, value: Option<f64>) -> Result<f64, MissingParamError> {
    if let Some(v) = value {
        if !v.is_finite() {
            return Err(MissingParamError {
                param_name: param_name(param),
                reason: "is non-finite (NaN or Infinity)",
            });
        }
        if v < 0.0 {
            return Err(MissingParamError {
                param_name: param_name(param),
                reason: "is negative; all profile params must be non-negative",
            });
        }
        return Ok(v);
    }
    default_param(param).ok_or_else(|| MissingParamError {
        param_name: param_name(param),
        reason: "is missing and has no built-in default",
    })
}

// ─── Profile document ───────────────────────────────────────────────────

/// Cost assumption overrides carried by a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostProfile {
    pub tool_fixed_cost: [f64; NUM_TOOLS],
    pub tool_cost_per_region: [f64; NUM_TOOLS],
    pub tool_hours_per_region: [f64; NUM_TOOLS],
    pub response_hours_per_region: [f64; NUM_RESPONSES],
}

/// Built-in cost assumptions applied when a profile carries none.
pub fn default_cost_assumptions() -> CostAssumptions {
    CostAssumptions {
        tool_fixed_cost: [48_000.0, 15_000.0, 22_000.0, 18_000.0, 6_000.0, 4_000.0],
        tool_cost_per_region: [900.0, 1_400.0, 2_600.0, 2_100.0, 350.0, 250.0],
        tool_hours_per_region: [10.0, 14.0, 24.0, 18.0, 4.0, 3.0],
        response_hours_per_region: [8.0, 16.0, 12.0, 10.0, 6.0, 20.0],
    }
}

/// One JSON-loadable engine profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineProfile {
    pub weights: [f64; NUM_INDICATORS],
    pub tools: [f64; NUM_TOOLS],
    pub responses: [f64; NUM_RESPONSES],
    pub assumed_tool_effectiveness: [f64; NUM_TOOLS],
    pub assumed_response_effectiveness: [f64; NUM_RESPONSES],
    #[serde(default)]
    pub focus: Option<f64>,
    #[serde(default)]
    pub cost: Option<CostProfile>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub target_budget: Option<f64>,
    #[serde(default)]
    pub budget_tolerance_ratio: Option<f64>,
    #[serde(default)]
    pub optimizer_seed: Option<f64>,
}

/// Rejection for profile materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A vector failed core validation.
    Config(ConfigError),
    /// A scalar failed fail-closed resolution.
    Param(MissingParamError),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::Config(e) => write!(f, "{e}"),
            ProfileError::Param(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<ConfigError> for ProfileError {
    fn from(e: ConfigError) -> Self {
        ProfileError::Config(e)
    }
}

impl From<MissingParamError> for ProfileError {
    fn from(e: MissingParamError) -> Self {
        ProfileError::Param(e)
    }
}

impl EngineProfile {
    /// Parse a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validated weight vector.
    pub fn weight_vector(&self) -> Result<WeightVector, ProfileError> {
        let weights = WeightVector(self.weights);
        weights.validate()?;
        Ok(weights)
    }

    /// Validated control state with resolved focus.
    pub fn control_state(&self) -> Result<ControlState, ProfileError> {
        let focus = resolve_param(ProfileParam::Focus, self.focus)?.clamp(0.0, 1.0);
        let state = ControlState {
            focus,
            tools: ToolAllocation(self.tools),
            responses: ResponseAllocation(self.responses),
            assumed_tool_effectiveness: self.assumed_tool_effectiveness,
            assumed_response_effectiveness: self.assumed_response_effectiveness,
        };
        state.validate()?;
        Ok(state)
    }

    /// Validated cost assumptions, defaulted when the profile has none.
    pub fn cost_assumptions(&self) -> Result<CostAssumptions, ProfileError> {
        let assumptions = match &self.cost {
            Some(cost) => CostAssumptions {
                tool_fixed_cost: cost.tool_fixed_cost,
                tool_cost_per_region: cost.tool_cost_per_region,
                tool_hours_per_region: cost.tool_hours_per_region,
                response_hours_per_region: cost.response_hours_per_region,
            },
            None => default_cost_assumptions(),
        };
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Resolved hourly rate.
    pub fn hourly_rate(&self) -> Result<f64, ProfileError> {
        Ok(resolve_param(ProfileParam::HourlyRate, self.hourly_rate)?)
    }

    /// Optimizer configuration. The target budget has no default and must
    /// be explicit; the tolerance derives from the tolerance ratio.
    pub fn optimizer_config(&self) -> Result<OptimizerConfig, ProfileError> {
        let target_budget = resolve_param(ProfileParam::TargetBudget, self.target_budget)?;
        let tolerance_ratio =
            resolve_param(ProfileParam::BudgetToleranceRatio, self.budget_tolerance_ratio)?;
        let seed = resolve_param(ProfileParam::OptimizerSeed, self.optimizer_seed)?;
        let mut config = OptimizerConfig::for_budget(target_budget, target_budget * tolerance_ratio);
        config.seed = seed as u64;
        config.max_restarts = resolve_param(ProfileParam::MaxRestarts, None)? as u32;
        config.min_improvement = resolve_param(ProfileParam::MinImprovement, None)?;
        config.max_fitness_evaluations =
            resolve_param(ProfileParam::MaxFitnessEvaluations, None)? as u32;
        config.annealing = AnnealingConfig {
            iterations: resolve_param(ProfileParam::AnnealingIterations, None)? as u32,
            initial_temperature: resolve_param(ProfileParam::AnnealingInitialTemperature, None)?,
            cooling: resolve_param(ProfileParam::AnnealingCooling, None)?,
        };
        config.genetic = GeneticConfig {
            population: resolve_param(ProfileParam::GeneticPopulation, None)? as usize,
            generations: resolve_param(ProfileParam::GeneticGenerations, None)? as u32,
            elites: resolve_param(ProfileParam::GeneticElites, None)? as usize,
            mutation_probability: resolve_param(ProfileParam::GeneticMutationProbability, None)?,
            mutation_scale: resolve_param(ProfileParam::GeneticMutationScale, None)?,
        };
        config.local_search = LocalSearchConfig {
            step: resolve_param(ProfileParam::LocalSearchStep, None)?,
            max_sweeps: resolve_param(ProfileParam::LocalSearchMaxSweeps, None)? as u32,
        };
        Ok(config)
    }
}
