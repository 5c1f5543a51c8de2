use warden_core::assessment::ControlState;
use warden_core::config::{
    CostAssumptions, NUM_RESPONSES, NUM_TOOLS, ResponseAllocation, ToolAllocation, WeightVector,
};
use warden_core::scoring::SelectedRegion;

/// Test helper: build a selected region with explicit volume and score.
#[allow(dead_code)]
pub fn selected(code: &str, volume: f64, score: f64) -> SelectedRegion {
    SelectedRegion {
        code: code.to_string(),
        volume,
        score,
    }
}

/// Test helper: the weight vector used by the worked scoring examples.
#[allow(dead_code)]
pub fn default_weights() -> WeightVector {
    WeightVector([30.0, 30.0, 10.0, 20.0, 10.0])
}

/// Test helper: every channel at the same coverage level.
#[allow(dead_code)]
pub fn uniform_tools(level: f64) -> ToolAllocation {
    ToolAllocation([level; NUM_TOOLS])
}

/// Test helper: every response method at the same weight.
#[allow(dead_code)]
pub fn uniform_responses(level: f64) -> ResponseAllocation {
    ResponseAllocation([level; NUM_RESPONSES])
}

/// Test helper: small flat cost assumptions with easy hand arithmetic.
#[allow(dead_code)]
pub fn flat_assumptions() -> CostAssumptions {
    CostAssumptions {
        tool_fixed_cost: [10_000.0; NUM_TOOLS],
        tool_cost_per_region: [200.0; NUM_TOOLS],
        tool_hours_per_region: [8.0; NUM_TOOLS],
        response_hours_per_region: [16.0; NUM_RESPONSES],
    }
}

/// Test helper: a control state with uniform allocations and uniform
/// assumed effectiveness.
#[allow(dead_code)]
pub fn control_state(focus: f64, tool_level: f64, response_level: f64, assumed: f64) -> ControlState {
    ControlState {
        focus,
        tools: uniform_tools(tool_level),
        responses: uniform_responses(response_level),
        assumed_tool_effectiveness: [assumed; NUM_TOOLS],
        assumed_response_effectiveness: [assumed; NUM_RESPONSES],
    }
}
