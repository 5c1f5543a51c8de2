//! Tests for response effectiveness.

use warden_core::config::{LINKED_CHANNEL, NUM_RESPONSES, RESPONSE_METHODS, ResponseAllocation};
use warden_core::mitigation::response_effectiveness;

#[test]
fn test_method_catalog_is_complete() {
    assert_eq!(RESPONSE_METHODS.len(), NUM_RESPONSES);
    // Slot 0 is the response side of the worker-voice channel.
    assert_eq!(RESPONSE_METHODS[LINKED_CHANNEL], "continuous-engagement");
}

#[test]
fn test_equal_weights_average_effectiveness() {
    let allocation = ResponseAllocation([10.0; NUM_RESPONSES]);
    let assumed = [60.0; NUM_RESPONSES];
    let effectiveness = response_effectiveness(&allocation, &assumed);
    assert!((effectiveness - 0.60).abs() < 1e-9);
}

#[test]
fn test_weighted_average() {
    // weights [10, 30] over effectiveness [50%, 90%]:
    // (10*0.5 + 30*0.9) / 40 = (5 + 27) / 40 = 0.8
    let allocation = ResponseAllocation([10.0, 30.0, 0.0, 0.0, 0.0, 0.0]);
    let assumed = [50.0, 90.0, 0.0, 0.0, 0.0, 0.0];
    let effectiveness = response_effectiveness(&allocation, &assumed);
    assert!((effectiveness - 0.8).abs() < 1e-9);
}

#[test]
fn test_zero_weights_yield_zero() {
    let allocation = ResponseAllocation([0.0; NUM_RESPONSES]);
    let assumed = [90.0; NUM_RESPONSES];
    assert_eq!(response_effectiveness(&allocation, &assumed), 0.0);
}

#[test]
fn test_no_diminishing_returns_across_methods() {
    // Unlike detection, splitting weight across methods with equal
    // effectiveness changes nothing: responses are independent levers.
    let assumed = [70.0; NUM_RESPONSES];
    let single = response_effectiveness(
        &ResponseAllocation([40.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        &assumed,
    );
    let spread = response_effectiveness(&ResponseAllocation([10.0; NUM_RESPONSES]), &assumed);
    assert!((single - spread).abs() < 1e-9);
}

#[test]
fn test_effectiveness_clamped_to_percent_range() {
    let allocation = ResponseAllocation([10.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let assumed = [250.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let effectiveness = response_effectiveness(&allocation, &assumed);
    assert!((effectiveness - 1.0).abs() < 1e-9);
}
