//! Full-chain evaluation: score → aggregate → distribute → mitigate → cost.
//!
//! This module wires the leaf modules into one production-path evaluation
//! the way a caller (or the optimizer's fitness function) consumes them.
//! Derived quantities are never stored; every call recomputes from the
//! inputs deterministically.

use crate::config::{
    ConfigError, CostAssumptions, NUM_RESPONSES, NUM_TOOLS, ResponseAllocation, ToolAllocation,
    WeightVector,
};
use crate::cost::total_cost;
use crate::focus::coverage::{CoverageInput, CoverageMetrics, distribute_coverage};
use crate::mitigation::managed_risk::{
    ManagedRiskInput, ManagedRiskMetrics, ManagedRiskOutcome, managed_risk,
};
use crate::scoring::{PortfolioAssessment, Region, SelectedRegion, aggregate, weighted_score};
use std::fmt;

/// The user-controlled state of the mitigation program.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Focus control in [0, 1].
    pub focus: f64,
    /// Detection channel allocation.
    pub tools: ToolAllocation,
    /// Response method allocation.
    pub responses: ResponseAllocation,
    /// Assumed per-channel detection effectiveness (percent).
    pub assumed_tool_effectiveness: [f64; NUM_TOOLS],
    /// Assumed per-method response effectiveness (percent).
    pub assumed_response_effectiveness: [f64; NUM_RESPONSES],
}

impl ControlState {
    /// Validate the allocations held by this state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tools.validate()?;
        self.responses.validate()
    }
}

/// One caller pick: a region code plus an optional exposure volume.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPick {
    pub code: String,
    pub volume: Option<f64>,
}

/// Rejection for selection building.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// A picked code resolves to no known region.
    UnknownRegion { code: String },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::UnknownRegion { code } => {
                write!(f, "selected code '{code}' resolves to no known region")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Resolve picks against the loaded regions and score each one.
///
/// Every selected code must resolve to a known region; an unknown code is
/// an invalid-configuration error, not a silent skip.
pub fn build_selection(
    regions: &[Region],
    weights: &WeightVector,
    picks: &[RegionPick],
) -> Result<Vec<SelectedRegion>, SelectionError> {
    let mut selection = Vec::with_capacity(picks.len());
    for pick in picks {
        let region = regions
            .iter()
            .find(|r| r.code == pick.code)
            .ok_or_else(|| SelectionError::UnknownRegion {
                code: pick.code.clone(),
            })?;
        let score = weighted_score(&region.indicators, weights);
        selection.push(SelectedRegion::new(pick.code.clone(), pick.volume, score));
    }
    Ok(selection)
}

/// Everything one evaluation of the chain produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Baseline portfolio state.
    pub portfolio: PortfolioAssessment,
    /// Managed risk per region and for the portfolio.
    pub managed: ManagedRiskOutcome,
    /// Total annual cost of the control state.
    pub total_cost: f64,
}

/// Aggregated metrics across the evaluation chain.
#[derive(Debug, Default)]
pub struct AssessmentMetrics {
    pub coverage: CoverageMetrics,
    pub managed: ManagedRiskMetrics,
}

impl AssessmentMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Evaluate the full chain for one control state over a scored selection.
pub fn evaluate(
    state: &ControlState,
    selection: &[SelectedRegion],
    assumptions: &CostAssumptions,
    hourly_rate: f64,
    metrics: &mut AssessmentMetrics,
) -> Assessment {
    let portfolio = aggregate(selection);

    let coverage = distribute_coverage(
        &CoverageInput {
            focus: state.focus,
            baseline_risk: portfolio.baseline_risk,
            base_coverage: &state.tools,
            regions: selection,
        },
        &mut metrics.coverage,
    );

    let managed = managed_risk(
        &ManagedRiskInput {
            focus: state.focus,
            portfolio: &portfolio,
            regions: selection,
            coverage: &coverage,
            assumed_tool_effectiveness: &state.assumed_tool_effectiveness,
            response: &state.responses,
            assumed_response_effectiveness: &state.assumed_response_effectiveness,
        },
        &mut metrics.managed,
    );

    let region_count = selection.len() as u32;
    let total_cost = total_cost(
        &state.tools,
        &state.responses,
        assumptions,
        region_count,
        hourly_rate,
    );

    Assessment {
        portfolio,
        managed,
        total_cost,
    }
}
