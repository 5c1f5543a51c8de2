//! Tests for the budget model.

mod common;

use common::flat_assumptions;
use warden_core::config::{CostAssumptions, NUM_RESPONSES, NUM_TOOLS, ResponseAllocation, ToolAllocation};
use warden_core::cost::total_cost;

#[test]
fn test_single_tool_cost_terms() {
    // Tool 0 at 50% over 10 regions, rate 100:
    //   fixed:    10000 * 0.5           = 5000
    //   variable: 200 * ceil(10*0.5)=5  = 1000
    //   hours:    5 * 8 * 100           = 4000
    // Response 1 at 30%: ceil(3)=3 regions * 16h * 100 = 4800
    // total = 14800
    let tools = ToolAllocation([50.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let responses = ResponseAllocation([0.0, 30.0, 0.0, 0.0, 0.0, 0.0]);
    let cost = total_cost(&tools, &responses, &flat_assumptions(), 10, 100.0);
    assert!((cost - 14_800.0).abs() < 1e-9);
}

#[test]
fn test_region_count_rounds_up() {
    // 11% of 37 regions = 4.07 -> 5 whole regions.
    let assumptions = CostAssumptions {
        tool_fixed_cost: [0.0; NUM_TOOLS],
        tool_cost_per_region: [100.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        tool_hours_per_region: [0.0; NUM_TOOLS],
        response_hours_per_region: [0.0; NUM_RESPONSES],
    };
    let tools = ToolAllocation([11.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let responses = ResponseAllocation([0.0; NUM_RESPONSES]);
    let cost = total_cost(&tools, &responses, &assumptions, 37, 100.0);
    assert!((cost - 500.0).abs() < 1e-9);
}

#[test]
fn test_zero_allocation_costs_nothing() {
    let tools = ToolAllocation([0.0; NUM_TOOLS]);
    let responses = ResponseAllocation([0.0; NUM_RESPONSES]);
    let cost = total_cost(&tools, &responses, &flat_assumptions(), 40, 150.0);
    assert_eq!(cost, 0.0);
}

#[test]
fn test_cost_monotone_in_coverage() {
    let responses = ResponseAllocation([0.0; NUM_RESPONSES]);
    let mut previous = 0.0;
    for level in [0.0, 20.0, 40.0, 60.0, 80.0, 100.0] {
        let tools = ToolAllocation([level; NUM_TOOLS]);
        let cost = total_cost(&tools, &responses, &flat_assumptions(), 25, 90.0);
        assert!(cost >= previous);
        previous = cost;
    }
}

#[test]
fn test_degenerate_rate_contributes_no_hour_terms() {
    let tools = ToolAllocation([50.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let responses = ResponseAllocation([0.0; NUM_RESPONSES]);
    // NaN rate degrades to 0 rather than poisoning the total:
    // fixed 5000 + variable 1000 + hours 0.
    let cost = total_cost(&tools, &responses, &flat_assumptions(), 10, f64::NAN);
    assert!((cost - 6_000.0).abs() < 1e-9);
}

#[test]
fn test_cost_is_pure() {
    let tools = ToolAllocation([33.0, 12.0, 90.0, 5.0, 61.0, 48.0]);
    let responses = ResponseAllocation([10.0, 20.0, 30.0, 15.0, 5.0, 40.0]);
    let first = total_cost(&tools, &responses, &flat_assumptions(), 18, 120.0);
    let second = total_cost(&tools, &responses, &flat_assumptions(), 18, 120.0);
    assert_eq!(first.to_bits(), second.to_bits());
}
