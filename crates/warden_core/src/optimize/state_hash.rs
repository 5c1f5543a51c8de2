//! Optimization state hash.
//!
//! `state_hash = xxh64(canonical serialization of all optimizer inputs)`
//!
//! **Hard rules:** no wall-clock timestamps, no tuning parameters (seed,
//! iteration counts): only the semantic inputs that change what an
//! optimal allocation looks like. Floats are quantized to 1e-6 before
//! hashing and regions are sorted by code, so the hash is independent of
//! selection order and float formatting.

use crate::assessment::ControlState;
use crate::config::CostAssumptions;
use crate::scoring::SelectedRegion;
use xxhash_rust::xxh64::xxh64;

/// Field separator that cannot appear in UTF-8 region codes, preventing
/// field-boundary ambiguity.
const SEP: u8 = 0xFF;

fn push_f64(buf: &mut Vec<u8>, value: f64) {
    // Quantize to 1e-6 so equal-up-to-noise inputs hash identically.
    let quantized = if value.is_finite() {
        (value * 1_000_000.0).round() as i64
    } else {
        i64::MIN
    };
    buf.extend_from_slice(&quantized.to_le_bytes());
    buf.push(SEP);
}

fn push_slice(buf: &mut Vec<u8>, values: &[f64]) {
    for &value in values {
        push_f64(buf, value);
    }
}

/// Hash every optimizer input into one 64-bit state fingerprint.
pub fn optimization_state_hash(
    state: &ControlState,
    selection: &[SelectedRegion],
    assumptions: &CostAssumptions,
    hourly_rate: f64,
    target_budget: f64,
    budget_tolerance: f64,
) -> u64 {
    let mut buf = Vec::with_capacity(512);

    push_f64(&mut buf, state.focus);
    push_slice(&mut buf, &state.tools.0);
    push_slice(&mut buf, &state.responses.0);
    push_slice(&mut buf, &state.assumed_tool_effectiveness);
    push_slice(&mut buf, &state.assumed_response_effectiveness);

    // Order-independent: hash regions sorted by code.
    let mut order: Vec<&SelectedRegion> = selection.iter().collect();
    order.sort_by(|a, b| a.code.cmp(&b.code));
    for region in order {
        buf.extend_from_slice(region.code.as_bytes());
        buf.push(SEP);
        push_f64(&mut buf, region.volume);
        push_f64(&mut buf, region.score);
    }

    push_slice(&mut buf, &assumptions.tool_fixed_cost);
    push_slice(&mut buf, &assumptions.tool_cost_per_region);
    push_slice(&mut buf, &assumptions.tool_hours_per_region);
    push_slice(&mut buf, &assumptions.response_hours_per_region);
    push_f64(&mut buf, hourly_rate);
    push_f64(&mut buf, target_budget);
    push_f64(&mut buf, budget_tolerance);

    xxh64(&buf, 0)
}
