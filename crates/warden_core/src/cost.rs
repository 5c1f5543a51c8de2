//! Budget model for a tool/response allocation.
//!
//! **Rule:**
//! - Per channel: `fixed·ratio + per_region·ceil(n·ratio)
//!   + ceil(n·ratio)·hours·rate`.
//! - Per response method: `ceil(n·ratio)·hours·rate`.
//! - Total is the sum of all terms. Pure function, no hidden state.
//!
//! `ceil` models the step nature of region counts: reaching 10.2% of 37
//! regions still means auditing 4 whole regions.

use crate::config::{CostAssumptions, NUM_RESPONSES, NUM_TOOLS, ResponseAllocation, ToolAllocation};

fn reached_regions(region_count: u32, ratio: f64) -> f64 {
    if ratio <= 0.0 || !ratio.is_finite() {
        return 0.0;
    }
    (f64::from(region_count) * ratio).ceil()
}

/// Total annual cost of an allocation.
///
/// `region_count` is the number of selected regions; `hourly_rate` prices
/// internal hours. Degenerate input (non-finite rate, zero regions)
/// contributes zero terms rather than faulting.
pub fn total_cost(
    tools: &ToolAllocation,
    responses: &ResponseAllocation,
    assumptions: &CostAssumptions,
    region_count: u32,
    hourly_rate: f64,
) -> f64 {
    let rate = if hourly_rate.is_finite() && hourly_rate > 0.0 {
        hourly_rate
    } else {
        0.0
    };

    let mut total = 0.0;
    for tool in 0..NUM_TOOLS {
        let ratio = (tools.0[tool].clamp(0.0, 100.0)) / 100.0;
        let regions = reached_regions(region_count, ratio);
        total += assumptions.tool_fixed_cost[tool] * ratio;
        total += assumptions.tool_cost_per_region[tool] * regions;
        total += regions * assumptions.tool_hours_per_region[tool] * rate;
    }
    for method in 0..NUM_RESPONSES {
        let ratio = (responses.0[method].clamp(0.0, 100.0)) / 100.0;
        let regions = reached_regions(region_count, ratio);
        total += regions * assumptions.response_hours_per_region[method] * rate;
    }
    total
}
