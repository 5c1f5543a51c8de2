//! Tests for the managed-risk calculator: progressive cap, floor, focus
//! multiplier, and the rank-preservation pass.

mod common;

use common::selected;
use warden_core::config::{
    MANAGED_FLOOR_RATIO, NUM_RESPONSES, NUM_TOOLS, RANK_EPSILON, ResponseAllocation,
};
use warden_core::focus::{CoverageInput, CoverageMetrics, RegionCoverage, distribute_coverage};
use warden_core::mitigation::{ManagedRiskInput, ManagedRiskMetrics, managed_risk};
use warden_core::scoring::{SelectedRegion, aggregate};

fn full_coverage_rows(selection: &[SelectedRegion]) -> Vec<RegionCoverage> {
    selection
        .iter()
        .map(|region| RegionCoverage {
            code: region.code.clone(),
            coverage: [100.0, 100.0, 100.0, 0.0, 0.0, 0.0],
        })
        .collect()
}

#[test]
fn test_rank_preserved_across_full_focus_sweep() {
    // Three regions with strictly ordered baselines must come out of the
    // calculator with managed risks in the same order, for every focus.
    let selection = vec![
        selected("AAA", 10.0, 90.0),
        selected("BBB", 10.0, 60.0),
        selected("CCC", 10.0, 30.0),
    ];
    let portfolio = aggregate(&selection);
    let tools = warden_core::config::ToolAllocation([70.0; NUM_TOOLS]);

    for step in 0..=20 {
        let focus = f64::from(step) / 20.0;
        let mut coverage_metrics = CoverageMetrics::new();
        let coverage = distribute_coverage(
            &CoverageInput {
                focus,
                baseline_risk: portfolio.baseline_risk,
                base_coverage: &tools,
                regions: &selection,
            },
            &mut coverage_metrics,
        );
        let mut metrics = ManagedRiskMetrics::new();
        let outcome = managed_risk(
            &ManagedRiskInput {
                focus,
                portfolio: &portfolio,
                regions: &selection,
                coverage: &coverage,
                assumed_tool_effectiveness: &[80.0; NUM_TOOLS],
                response: &ResponseAllocation([40.0; NUM_RESPONSES]),
                assumed_response_effectiveness: &[70.0; NUM_RESPONSES],
            },
            &mut metrics,
        );

        let managed: Vec<f64> = outcome.regions.iter().map(|r| r.managed).collect();
        assert!(
            managed[0] >= managed[1] - 1e-9 && managed[1] >= managed[2] - 1e-9,
            "focus {focus}: rank inverted: {managed:?}"
        );
        // Transitivity across the chain, not just adjacent pairs.
        assert!(managed[0] >= managed[2] - 1e-9, "focus {focus}");
    }
}

#[test]
fn test_floor_holds_for_every_region() {
    let selection = vec![
        selected("AAA", 10.0, 85.0),
        selected("BBB", 10.0, 84.0),
        selected("CCC", 10.0, 55.0),
        selected("DDD", 10.0, 12.0),
    ];
    let portfolio = aggregate(&selection);

    for step in 0..=10 {
        let focus = f64::from(step) / 10.0;
        let coverage = full_coverage_rows(&selection);
        let mut metrics = ManagedRiskMetrics::new();
        let outcome = managed_risk(
            &ManagedRiskInput {
                focus,
                portfolio: &portfolio,
                regions: &selection,
                coverage: &coverage,
                assumed_tool_effectiveness: &[100.0; NUM_TOOLS],
                response: &ResponseAllocation([50.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
                assumed_response_effectiveness: &[100.0; NUM_RESPONSES],
            },
            &mut metrics,
        );
        for region in &outcome.regions {
            assert!(
                region.managed >= region.baseline * MANAGED_FLOOR_RATIO - 1e-9,
                "focus {focus} {}: {} below floor",
                region.code,
                region.managed
            );
        }
    }
}

#[test]
fn test_progressive_cap_corrects_local_inversion() {
    // Two close baselines under high focus: the high-risk bonus pushes
    // the 62-score region against its progressive cap
    // (0.70 - 0.20*0.62 = 0.576) while the 58-score region stays
    // uncapped with a weaker multiplier, which inverts the local
    // ordering. The rank pass must force the lower-baseline region to
    // sit RANK_EPSILON under its neighbor.
    let selection = vec![selected("AAA", 10.0, 62.0), selected("BBB", 10.0, 58.0)];
    let portfolio = aggregate(&selection);
    let coverage = full_coverage_rows(&selection);

    let mut metrics = ManagedRiskMetrics::new();
    let outcome = managed_risk(
        &ManagedRiskInput {
            focus: 0.9,
            portfolio: &portfolio,
            regions: &selection,
            coverage: &coverage,
            // Full stack detection saturates at the 0.90 ceiling;
            // response lands at 0.61: raw reduction for AAA is
            // 0.9*0.61*mult ≈ 0.65 > cap.
            assumed_tool_effectiveness: &[100.0; NUM_TOOLS],
            response: &ResponseAllocation([50.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            assumed_response_effectiveness: &[61.0; NUM_RESPONSES],
        },
        &mut metrics,
    );

    let aaa = &outcome.regions[0];
    let bbb = &outcome.regions[1];
    // AAA is capped: managed = 62 * (1 - 0.576) = 26.288.
    assert!((aaa.managed - 62.0 * (1.0 - 0.576)).abs() < 1e-9);
    // BBB was forced down to AAA's managed risk minus epsilon.
    assert!((bbb.managed - (aaa.managed - RANK_EPSILON)).abs() < 1e-9);
    assert!(metrics.rank_corrections_total() >= 1);
}

#[test]
fn test_zero_focus_reduces_uniformly() {
    // With focus 0 the multiplier is exactly 1 for every region, so two
    // regions with identical coverage take the same reduction fraction
    // (as long as neither hits its cap) and managed risk stays
    // proportional to baseline.
    let selection = vec![selected("AAA", 10.0, 80.0), selected("BBB", 10.0, 40.0)];
    let portfolio = aggregate(&selection);
    let coverage: Vec<RegionCoverage> = selection
        .iter()
        .map(|region| RegionCoverage {
            code: region.code.clone(),
            coverage: [30.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        })
        .collect();

    let mut metrics = ManagedRiskMetrics::new();
    let outcome = managed_risk(
        &ManagedRiskInput {
            focus: 0.0,
            portfolio: &portfolio,
            regions: &selection,
            coverage: &coverage,
            assumed_tool_effectiveness: &[70.0; NUM_TOOLS],
            response: &ResponseAllocation([20.0; NUM_RESPONSES]),
            assumed_response_effectiveness: &[50.0; NUM_RESPONSES],
        },
        &mut metrics,
    );

    let ratio_a = outcome.regions[0].managed / 80.0;
    let ratio_b = outcome.regions[1].managed / 40.0;
    assert!((ratio_a - ratio_b).abs() < 1e-9);
    assert_eq!(metrics.rank_corrections_total(), 0);
}

#[test]
fn test_zero_baseline_region_stays_zero() {
    let selection = vec![selected("AAA", 10.0, 50.0), selected("ZZZ", 10.0, 0.0)];
    let portfolio = aggregate(&selection);
    let coverage = full_coverage_rows(&selection);
    let mut metrics = ManagedRiskMetrics::new();
    let outcome = managed_risk(
        &ManagedRiskInput {
            focus: 0.5,
            portfolio: &portfolio,
            regions: &selection,
            coverage: &coverage,
            assumed_tool_effectiveness: &[80.0; NUM_TOOLS],
            response: &ResponseAllocation([30.0; NUM_RESPONSES]),
            assumed_response_effectiveness: &[60.0; NUM_RESPONSES],
        },
        &mut metrics,
    );
    assert_eq!(outcome.regions[1].managed, 0.0);
    assert_eq!(outcome.regions[1].reduction, 0.0);
}

#[test]
fn test_portfolio_managed_risk_recomputed_after_corrections() {
    let selection = vec![selected("AAA", 10.0, 62.0), selected("BBB", 30.0, 58.0)];
    let portfolio = aggregate(&selection);
    let coverage = full_coverage_rows(&selection);
    let mut metrics = ManagedRiskMetrics::new();
    let outcome = managed_risk(
        &ManagedRiskInput {
            focus: 0.9,
            portfolio: &portfolio,
            regions: &selection,
            coverage: &coverage,
            assumed_tool_effectiveness: &[100.0; NUM_TOOLS],
            response: &ResponseAllocation([50.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            assumed_response_effectiveness: &[61.0; NUM_RESPONSES],
        },
        &mut metrics,
    );
    let expected = (10.0 * outcome.regions[0].managed + 30.0 * outcome.regions[1].managed) / 40.0;
    assert!((outcome.portfolio_managed_risk - expected).abs() < 1e-9);
}

#[test]
fn test_managed_risk_is_idempotent() {
    let selection = vec![
        selected("AAA", 10.0, 77.0),
        selected("BBB", 20.0, 51.0),
        selected("CCC", 5.0, 23.0),
    ];
    let portfolio = aggregate(&selection);
    let coverage = full_coverage_rows(&selection);
    let input = ManagedRiskInput {
        focus: 0.65,
        portfolio: &portfolio,
        regions: &selection,
        coverage: &coverage,
        assumed_tool_effectiveness: &[75.0; NUM_TOOLS],
        response: &ResponseAllocation([25.0; NUM_RESPONSES]),
        assumed_response_effectiveness: &[55.0; NUM_RESPONSES],
    };
    let mut metrics = ManagedRiskMetrics::new();
    let first = managed_risk(&input, &mut metrics);
    let second = managed_risk(&input, &mut metrics);
    assert_eq!(first, second);
}
