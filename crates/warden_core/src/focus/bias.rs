//! Focus bias function: exponent curve and biased risk ratio.
//!
//! **Rule:**
//! - `focus_exponent` rises piecewise-linearly from 1.0 to the 2.0 cap,
//!   faster below the knee at focus 0.5 than above it. The flat top end
//!   limits how aggressive high-focus settings can become.
//! - `biased_ratio` clamps the risk ratio to `[0.08, 2.5]`, raises it to
//!   the focus exponent, then applies two bounded compression passes:
//!   low-ratio compression fading in below clamped ratio 0.8, and
//!   extreme-value compression fading in when the biased value exceeds
//!   1.5 and focus exceeds 0.7.
//!
//! Both functions are pure. Compression strengths are capped at 10% so
//! the biased ratio remains non-decreasing in focus (for ratios above 1)
//! and non-decreasing in the risk ratio (for fixed focus); a stronger
//! step compression would invert the ordering just past its gate.

use crate::config::{
    EXTREME_BIAS_KNEE, EXTREME_COMPRESSION, EXTREME_FOCUS_GATE, FOCUS_EXPONENT_AT_KNEE,
    FOCUS_EXPONENT_KNEE, LOW_RATIO_COMPRESSION, LOW_RATIO_KNEE, MAX_FOCUS_EXPONENT,
    MAX_RISK_RATIO, MIN_FOCUS_EXPONENT, MIN_RISK_RATIO,
};

fn clamp_focus(focus: f64) -> f64 {
    if !focus.is_finite() {
        return 0.0;
    }
    focus.clamp(0.0, 1.0)
}

/// Map focus to the bias exponent.
pub fn focus_exponent(focus: f64) -> f64 {
    let focus = clamp_focus(focus);
    let exponent = if focus <= FOCUS_EXPONENT_KNEE {
        let rise = FOCUS_EXPONENT_AT_KNEE - MIN_FOCUS_EXPONENT;
        MIN_FOCUS_EXPONENT + rise * (focus / FOCUS_EXPONENT_KNEE)
    } else {
        let rise = MAX_FOCUS_EXPONENT - FOCUS_EXPONENT_AT_KNEE;
        let span = 1.0 - FOCUS_EXPONENT_KNEE;
        FOCUS_EXPONENT_AT_KNEE + rise * ((focus - FOCUS_EXPONENT_KNEE) / span)
    };
    exponent.min(MAX_FOCUS_EXPONENT)
}

/// Bias a region's risk ratio by the focus exponent, then compress.
///
/// `risk_ratio` is `region_risk / baseline_risk`. Degenerate input (NaN,
/// infinite) falls back to the neutral ratio 1.0 before clamping.
pub fn biased_ratio(risk_ratio: f64, focus: f64) -> f64 {
    let focus = clamp_focus(focus);
    let ratio = if risk_ratio.is_finite() { risk_ratio } else { 1.0 };
    let clamped = ratio.clamp(MIN_RISK_RATIO, MAX_RISK_RATIO);
    let mut biased = clamped.powf(focus_exponent(focus));

    // Low-ratio compression: pull low-risk regions back toward the
    // neutral ratio so they are not starved of coverage. Fades out as the
    // clamped ratio approaches the knee, keeping the ratio axis monotone.
    if clamped < LOW_RATIO_KNEE {
        let fade = (LOW_RATIO_KNEE - clamped) / (LOW_RATIO_KNEE - MIN_RISK_RATIO);
        biased += (1.0 - biased) * LOW_RATIO_COMPRESSION * fade;
    }

    // Extreme-value compression: shave the excess over the knee so a few
    // high-risk regions cannot absorb a runaway share as focus → 1.
    // Fades in with focus above the gate, keeping the focus axis monotone.
    if biased > EXTREME_BIAS_KNEE && focus > EXTREME_FOCUS_GATE {
        let fade = (focus - EXTREME_FOCUS_GATE) / (1.0 - EXTREME_FOCUS_GATE);
        biased -= (biased - EXTREME_BIAS_KNEE) * EXTREME_COMPRESSION * fade;
    }

    biased
}
