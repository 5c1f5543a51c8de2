//! Portfolio aggregation: baseline risk and risk concentration.
//!
//! **Rule:**
//! - `baseline_risk = Σ(volume·score) / Σ(volume)`, 0 on zero volume.
//! - `concentration = max(1, Σ(share·score²) / baseline²)` with
//!   `share = volume / total_volume`; 1 whenever baseline ≤ 0.
//!
//! Concentration K = 1 means risk is spread uniformly across the
//! portfolio's volume; larger K means a few regions carry most of it.

use crate::config::DEFAULT_REGION_VOLUME;

/// One selected region with its exposure volume and computed risk score.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRegion {
    /// Region code; must resolve to a known region.
    pub code: String,
    /// Exposure volume (non-negative).
    pub volume: f64,
    /// Weighted risk score in [0, 100].
    pub score: f64,
}

impl SelectedRegion {
    /// Build a selection entry, falling back to [`DEFAULT_REGION_VOLUME`]
    /// when the caller supplies no volume.
    pub fn new(code: impl Into<String>, volume: Option<f64>, score: f64) -> Self {
        Self {
            code: code.into(),
            volume: volume.unwrap_or(DEFAULT_REGION_VOLUME),
            score,
        }
    }
}

/// Aggregated portfolio state before any mitigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioAssessment {
    /// Volume-weighted mean risk score.
    pub baseline_risk: f64,
    /// Sum of selected volumes.
    pub total_volume: f64,
    /// Risk concentration K ≥ 1.
    pub concentration: f64,
}

/// Aggregate a selection into baseline risk and concentration.
///
/// Degenerate states (empty selection, zero volume, zero baseline) return
/// neutral values; no division by zero can occur.
pub fn aggregate(selection: &[SelectedRegion]) -> PortfolioAssessment {
    let mut total_volume = 0.0;
    let mut weighted_risk = 0.0;
    for region in selection {
        if !region.volume.is_finite() || !region.score.is_finite() || region.volume <= 0.0 {
            continue;
        }
        total_volume += region.volume;
        weighted_risk += region.volume * region.score;
    }

    if total_volume <= 0.0 {
        return PortfolioAssessment {
            baseline_risk: 0.0,
            total_volume: 0.0,
            concentration: 1.0,
        };
    }

    let baseline_risk = weighted_risk / total_volume;
    if baseline_risk <= 0.0 {
        return PortfolioAssessment {
            baseline_risk,
            total_volume,
            concentration: 1.0,
        };
    }

    let mut share_weighted_squares = 0.0;
    for region in selection {
        if !region.volume.is_finite() || !region.score.is_finite() || region.volume <= 0.0 {
            continue;
        }
        let share = region.volume / total_volume;
        share_weighted_squares += share * region.score * region.score;
    }

    let concentration = (share_weighted_squares / (baseline_risk * baseline_risk)).max(1.0);
    PortfolioAssessment {
        baseline_risk,
        total_volume,
        concentration,
    }
}
