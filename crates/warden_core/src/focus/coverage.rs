//! Coverage distribution across regions under resource conservation.
//!
//! **Rule:**
//! - Per region: `adjustment = (1-focus) + focus·biased_ratio`, plus a
//!   smooth high-risk boost of at most +30% that phases in as focus
//!   exceeds 0.3 and region risk exceeds the high-risk score.
//! - Per channel, afterwards: if `Σ(adjusted·volume)` exceeds the
//!   original total usage by more than the expansion cap, every region's
//!   adjusted coverage for that channel is scaled down by
//!   `allowed / actual`.
//!
//! The conservation pass is a hard global constraint enforced after the
//! per-region local computation: focus redirects capacity, it does not
//! mint it.

use crate::config::{
    BOOST_FOCUS_GATE, EXPANSION_CAP, HIGH_RISK_RAMP, HIGH_RISK_SCORE, MAX_HIGH_RISK_BOOST,
    NUM_TOOLS, ToolAllocation,
};
use crate::focus::bias::biased_ratio;
use crate::scoring::SelectedRegion;

/// Input to the coverage distributor.
#[derive(Debug, Clone)]
pub struct CoverageInput<'a> {
    /// Focus control in [0, 1].
    pub focus: f64,
    /// Volume-weighted baseline risk of the portfolio.
    pub baseline_risk: f64,
    /// Baseline channel mix (percent of regions reached per channel).
    pub base_coverage: &'a ToolAllocation,
    /// Selected regions with volumes and scores.
    pub regions: &'a [SelectedRegion],
}

/// Distributed coverage for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCoverage {
    /// Region code.
    pub code: String,
    /// Adjusted per-channel coverage (percent, [0, 100]).
    pub coverage: [f64; NUM_TOOLS],
}

/// Observability counters for the coverage distributor.
#[derive(Debug, Default)]
pub struct CoverageMetrics {
    distributed_total: u64,
    conservation_scaled_total: u64,
}

impl CoverageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distribution runs performed.
    pub fn distributed_total(&self) -> u64 {
        self.distributed_total
    }

    /// Channel columns scaled down by the conservation pass.
    pub fn conservation_scaled_total(&self) -> u64 {
        self.conservation_scaled_total
    }

    fn record_distributed(&mut self) {
        self.distributed_total += 1;
    }

    fn record_conservation_scaled(&mut self) {
        self.conservation_scaled_total += 1;
    }
}

fn smooth_ramp(value: f64, start: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return if value > start { 1.0 } else { 0.0 };
    }
    ((value - start) / span).clamp(0.0, 1.0)
}

/// Distribute the baseline channel mix across regions by focus bias.
///
/// A non-positive baseline risk disables redistribution: every region
/// receives the baseline mix unchanged.
pub fn distribute_coverage(
    input: &CoverageInput<'_>,
    metrics: &mut CoverageMetrics,
) -> Vec<RegionCoverage> {
    metrics.record_distributed();
    let focus = if input.focus.is_finite() {
        input.focus.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let neutral = input.baseline_risk <= 0.0 || !input.baseline_risk.is_finite();
    let mut distributed: Vec<RegionCoverage> = Vec::with_capacity(input.regions.len());

    for region in input.regions {
        let mut coverage = input.base_coverage.0;
        if !neutral {
            let ratio = region.score / input.baseline_risk;
            let bias = biased_ratio(ratio, focus);
            let adjustment = (1.0 - focus) + focus * bias;

            // High-risk boost phases in on both axes to avoid a step.
            let focus_ramp = smooth_ramp(focus, BOOST_FOCUS_GATE, 1.0 - BOOST_FOCUS_GATE);
            let risk_ramp = smooth_ramp(region.score, HIGH_RISK_SCORE, HIGH_RISK_RAMP);
            let boost = 1.0 + MAX_HIGH_RISK_BOOST * focus_ramp * risk_ramp;

            for slot in coverage.iter_mut() {
                *slot = (*slot * adjustment * boost).clamp(0.0, 100.0);
            }
        }
        distributed.push(RegionCoverage {
            code: region.code.clone(),
            coverage,
        });
    }

    if neutral {
        return distributed;
    }

    // Resource conservation, per channel column.
    for tool in 0..NUM_TOOLS {
        let mut base_usage = 0.0;
        let mut adjusted_usage = 0.0;
        for (region, row) in input.regions.iter().zip(distributed.iter()) {
            let volume = if region.volume.is_finite() && region.volume > 0.0 {
                region.volume
            } else {
                0.0
            };
            base_usage += input.base_coverage.0[tool] * volume;
            adjusted_usage += row.coverage[tool] * volume;
        }

        let allowed = base_usage * (1.0 + EXPANSION_CAP);
        if adjusted_usage > allowed && adjusted_usage > 0.0 {
            let scale = allowed / adjusted_usage;
            for row in distributed.iter_mut() {
                row.coverage[tool] *= scale;
            }
            metrics.record_conservation_scaled();
            tracing::debug!(
                "CoverageConservation tool={} usage={:.3} allowed={:.3} scale={:.4}",
                tool,
                adjusted_usage,
                allowed,
                scale
            );
        }
    }

    distributed
}
