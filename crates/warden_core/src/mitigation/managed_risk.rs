//! Managed risk with progressive capping and rank preservation.
//!
//! **Rule (per region with baseline > 0):**
//! - `raw_reduction = detection · response · focus_multiplier`.
//! - The focus multiplier is the γ-blend
//!   `(1 - focus·γ) + focus·γ·biased_ratio`; when focus exceeds the
//!   high-focus gate and the region is high risk, the blend gets the
//!   bonus multiplier on top.
//! - The reduction clamps against a progressive cap falling linearly from
//!   [`REDUCTION_CAP_AT_ZERO`] at zero risk to [`REDUCTION_CAP_AT_MAX`]
//!   at risk 100.
//! - Managed risk never falls below `MANAGED_FLOOR_RATIO · baseline`.
//!
//! The local cap and floor bound each region individually but do not
//! guarantee a globally monotone mapping from baseline rank to managed
//! rank, so a final pass walks regions in descending baseline order and
//! forces any out-of-order managed value down to
//! `max(floor, previous - RANK_EPSILON)`. Each corrected value becomes
//! the next comparison's predecessor, which makes the single walk
//! transitively consistent.

use crate::config::{
    CONCENTRATION_SENSITIVITY, HIGH_FOCUS_BONUS, HIGH_FOCUS_GATE, HIGH_RISK_SCORE,
    MANAGED_FLOOR_RATIO, NUM_RESPONSES, NUM_TOOLS, RANK_EPSILON, REDUCTION_CAP_AT_MAX,
    REDUCTION_CAP_AT_ZERO, ResponseAllocation,
};
use crate::focus::bias::biased_ratio;
use crate::focus::coverage::RegionCoverage;
use crate::mitigation::detection::detection_effectiveness;
use crate::mitigation::response::response_effectiveness;
use crate::scoring::{PortfolioAssessment, SelectedRegion};

/// Input to the managed-risk calculator.
#[derive(Debug, Clone)]
pub struct ManagedRiskInput<'a> {
    /// Focus control in [0, 1].
    pub focus: f64,
    /// Aggregated baseline portfolio state.
    pub portfolio: &'a PortfolioAssessment,
    /// Selected regions; order matches `coverage`.
    pub regions: &'a [SelectedRegion],
    /// Distributed per-region coverage from the coverage distributor.
    pub coverage: &'a [RegionCoverage],
    /// Assumed per-channel detection effectiveness (percent).
    pub assumed_tool_effectiveness: &'a [f64; NUM_TOOLS],
    /// Response method allocation.
    pub response: &'a ResponseAllocation,
    /// Assumed per-method response effectiveness (percent).
    pub assumed_response_effectiveness: &'a [f64; NUM_RESPONSES],
}

/// Managed risk for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionManagedRisk {
    /// Region code.
    pub code: String,
    /// Baseline risk score.
    pub baseline: f64,
    /// Managed risk score after detection, response, and focus effects.
    pub managed: f64,
    /// Applied reduction fraction in [0, 1).
    pub reduction: f64,
}

/// Full managed-risk outcome for the portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedRiskOutcome {
    /// Per-region managed risks, in input order.
    pub regions: Vec<RegionManagedRisk>,
    /// Volume-weighted portfolio managed risk, recomputed after the
    /// rank-preservation pass.
    pub portfolio_managed_risk: f64,
}

/// Observability counters for the managed-risk calculator.
#[derive(Debug, Default)]
pub struct ManagedRiskMetrics {
    evaluated_total: u64,
    rank_corrections_total: u64,
    floor_hits_total: u64,
}

impl ManagedRiskMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator runs performed.
    pub fn evaluated_total(&self) -> u64 {
        self.evaluated_total
    }

    /// Managed values forced down by the rank-preservation pass.
    pub fn rank_corrections_total(&self) -> u64 {
        self.rank_corrections_total
    }

    /// Regions whose managed risk landed on the floor.
    pub fn floor_hits_total(&self) -> u64 {
        self.floor_hits_total
    }

    fn record_evaluated(&mut self) {
        self.evaluated_total += 1;
    }

    fn record_rank_correction(&mut self) {
        self.rank_corrections_total += 1;
    }

    fn record_floor_hit(&mut self) {
        self.floor_hits_total += 1;
    }
}

fn progressive_cap(baseline: f64) -> f64 {
    let span = REDUCTION_CAP_AT_ZERO - REDUCTION_CAP_AT_MAX;
    let position = (baseline / 100.0).clamp(0.0, 1.0);
    REDUCTION_CAP_AT_ZERO - span * position
}

fn region_focus_multiplier(focus: f64, baseline_risk: f64, region_score: f64) -> f64 {
    if baseline_risk <= 0.0 {
        return 1.0;
    }
    let gamma = CONCENTRATION_SENSITIVITY;
    let bias = biased_ratio(region_score / baseline_risk, focus);
    let blend = (1.0 - focus * gamma) + focus * gamma * bias;
    if focus > HIGH_FOCUS_GATE && region_score >= HIGH_RISK_SCORE {
        blend * HIGH_FOCUS_BONUS
    } else {
        blend
    }
}

/// Compute managed risk per region and for the portfolio.
///
/// Regions with baseline ≤ 0 keep managed risk 0; mitigation cannot
/// create risk where none was scored.
pub fn managed_risk(
    input: &ManagedRiskInput<'_>,
    metrics: &mut ManagedRiskMetrics,
) -> ManagedRiskOutcome {
    metrics.record_evaluated();
    let focus = if input.focus.is_finite() {
        input.focus.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let response = response_effectiveness(input.response, input.assumed_response_effectiveness);
    let baseline_risk = input.portfolio.baseline_risk;

    let neutral_coverage = [0.0; NUM_TOOLS];
    let mut regions: Vec<RegionManagedRisk> = Vec::with_capacity(input.regions.len());
    for (index, region) in input.regions.iter().enumerate() {
        if region.score <= 0.0 || !region.score.is_finite() {
            regions.push(RegionManagedRisk {
                code: region.code.clone(),
                baseline: region.score.max(0.0),
                managed: 0.0,
                reduction: 0.0,
            });
            continue;
        }

        let coverage = input
            .coverage
            .get(index)
            .map(|row| &row.coverage)
            .unwrap_or(&neutral_coverage);
        let detection = detection_effectiveness(coverage, input.assumed_tool_effectiveness);
        let multiplier = region_focus_multiplier(focus, baseline_risk, region.score);

        let raw_reduction = detection * response * multiplier;
        let capped = raw_reduction.clamp(0.0, progressive_cap(region.score));
        let mut managed = region.score * (1.0 - capped);

        let floor = region.score * MANAGED_FLOOR_RATIO;
        if managed < floor {
            managed = floor;
            metrics.record_floor_hit();
        }

        regions.push(RegionManagedRisk {
            code: region.code.clone(),
            baseline: region.score,
            managed,
            reduction: 1.0 - managed / region.score,
        });
    }

    rank_preservation_pass(&mut regions, metrics);

    // Portfolio managed risk is recomputed after the correction.
    let mut total_volume = 0.0;
    let mut weighted_managed = 0.0;
    for (region, outcome) in input.regions.iter().zip(regions.iter()) {
        if !region.volume.is_finite() || region.volume <= 0.0 {
            continue;
        }
        total_volume += region.volume;
        weighted_managed += region.volume * outcome.managed;
    }
    let portfolio_managed_risk = if total_volume > 0.0 {
        weighted_managed / total_volume
    } else {
        0.0
    };

    ManagedRiskOutcome {
        regions,
        portfolio_managed_risk,
    }
}

/// Walk regions in descending baseline order and force any managed value
/// that reaches or exceeds its higher-baseline predecessor down to
/// `max(floor, predecessor - RANK_EPSILON)`.
fn rank_preservation_pass(regions: &mut [RegionManagedRisk], metrics: &mut ManagedRiskMetrics) {
    let mut order: Vec<usize> = (0..regions.len())
        .filter(|&i| regions[i].baseline > 0.0)
        .collect();
    if order.len() < 2 {
        return;
    }
    order.sort_by(|&a, &b| {
        regions[b]
            .baseline
            .partial_cmp(&regions[a].baseline)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut previous = regions[order[0]].managed;
    for &index in order.iter().skip(1) {
        let entry = &mut regions[index];
        if entry.managed >= previous {
            let floor = entry.baseline * MANAGED_FLOOR_RATIO;
            let forced = (previous - RANK_EPSILON).max(floor);
            tracing::debug!(
                "RankCorrection code={} managed={:.3} forced={:.3} previous={:.3}",
                entry.code,
                entry.managed,
                forced,
                previous
            );
            entry.managed = forced;
            entry.reduction = 1.0 - entry.managed / entry.baseline;
            metrics.record_rank_correction();
        }
        previous = regions[index].managed;
    }
}
