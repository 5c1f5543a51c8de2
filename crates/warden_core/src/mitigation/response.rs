//! Response effectiveness.
//!
//! **Rule:** `Σ(weight_i / Σweight · effectiveness_i)` over the response
//! methods, as a fraction in [0, 1]. No diminishing returns: response
//! methods are independent remediation levers, not overlapping detection
//! channels.

use crate::config::{NUM_RESPONSES, ResponseAllocation};

/// Fold the response allocation and assumed per-method effectiveness
/// (percent, 0-100) into one response effectiveness in [0, 1].
///
/// Zero total weight yields 0.
pub fn response_effectiveness(
    allocation: &ResponseAllocation,
    assumed_effectiveness: &[f64; NUM_RESPONSES],
) -> f64 {
    let mut weight_sum = 0.0;
    let mut weighted = 0.0;
    for (weight, assumed) in allocation.0.iter().zip(assumed_effectiveness.iter()) {
        if !weight.is_finite() || !assumed.is_finite() || *weight <= 0.0 {
            continue;
        }
        let effectiveness = assumed.clamp(0.0, 100.0) / 100.0;
        weight_sum += weight;
        weighted += weight * effectiveness;
    }
    if weight_sum <= 0.0 {
        return 0.0;
    }
    (weighted / weight_sum).clamp(0.0, 1.0)
}
