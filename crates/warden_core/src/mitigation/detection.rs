//! Detection effectiveness with category grouping and diminishing returns.
//!
//! **Rule:**
//! - Per member channel: `p = (coverage/100) · avg_effectiveness` where
//!   `avg_effectiveness` is the mean of the catalog base constant and the
//!   caller-assumed effectiveness.
//! - Within a category: `1 - Π(1 - p_i)`, scaled by the category weight.
//! - Across categories: `1 - Π(1 - contribution)`.
//! - Final result clamped to [`DETECTION_CEILING`]; some risk is never
//!   detectable.
//!
//! The complement-of-product form treats channels as independent
//! detection probabilities, so stacking channels has diminishing returns.

use crate::config::{DETECTION_CATALOG, DETECTION_CEILING, NUM_TOOLS};

fn channel_probability(coverage: f64, base_effectiveness: f64, assumed: f64) -> f64 {
    let coverage = if coverage.is_finite() {
        coverage.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let assumed = if assumed.is_finite() {
        assumed.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let avg_effectiveness = (base_effectiveness + assumed) / 2.0;
    (coverage * avg_effectiveness).clamp(0.0, 1.0)
}

/// Fold per-channel coverage and assumed effectiveness into one detection
/// effectiveness in `[0, DETECTION_CEILING]`.
///
/// `coverage` and `assumed_effectiveness` are percentages (0-100) per
/// channel slot.
pub fn detection_effectiveness(
    coverage: &[f64; NUM_TOOLS],
    assumed_effectiveness: &[f64; NUM_TOOLS],
) -> f64 {
    let mut miss_all_categories = 1.0;
    for category in &DETECTION_CATALOG {
        let mut miss_within = 1.0;
        for &member in category.members {
            let p = channel_probability(
                coverage[member],
                category.base_effectiveness,
                assumed_effectiveness[member],
            );
            miss_within *= 1.0 - p;
        }
        let contribution = (1.0 - miss_within) * category.weight;
        miss_all_categories *= 1.0 - contribution.clamp(0.0, 1.0);
    }
    (1.0 - miss_all_categories).clamp(0.0, DETECTION_CEILING)
}
