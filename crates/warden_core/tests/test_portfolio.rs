//! Tests for portfolio aggregation and risk concentration.

mod common;

use common::selected;
use warden_core::config::DEFAULT_REGION_VOLUME;
use warden_core::scoring::{SelectedRegion, aggregate};

#[test]
fn test_volume_weighted_baseline_and_concentration() {
    // volumes = [10,20], scores = [80,20]
    // baseline = (10*80 + 20*20) / 30 = 1200/30 = 40
    // share-weighted squares = (10/30)*6400 + (20/30)*400
    //                        = 2133.33 + 266.67 = 2400
    // concentration = 2400 / 1600 = 1.5
    let selection = vec![selected("AAA", 10.0, 80.0), selected("BBB", 20.0, 20.0)];
    let portfolio = aggregate(&selection);
    assert!((portfolio.baseline_risk - 40.0).abs() < 1e-9);
    assert!((portfolio.total_volume - 30.0).abs() < 1e-9);
    assert!((portfolio.concentration - 1.5).abs() < 1e-9);
}

#[test]
fn test_baseline_is_convex_combination_of_scores() {
    let selection = vec![
        selected("AAA", 3.0, 17.0),
        selected("BBB", 11.0, 62.0),
        selected("CCC", 6.0, 44.5),
        selected("DDD", 1.5, 91.0),
    ];
    let portfolio = aggregate(&selection);
    assert!(portfolio.baseline_risk >= 17.0);
    assert!(portfolio.baseline_risk <= 91.0);
}

#[test]
fn test_concentration_is_one_for_equal_scores() {
    let selection = vec![
        selected("AAA", 5.0, 35.0),
        selected("BBB", 25.0, 35.0),
        selected("CCC", 10.0, 35.0),
    ];
    let portfolio = aggregate(&selection);
    assert!((portfolio.concentration - 1.0).abs() < 1e-9);
}

#[test]
fn test_concentration_never_below_one() {
    let selection = vec![
        selected("AAA", 10.0, 10.0),
        selected("BBB", 10.0, 50.0),
        selected("CCC", 40.0, 30.0),
    ];
    let portfolio = aggregate(&selection);
    assert!(portfolio.concentration >= 1.0);
}

#[test]
fn test_empty_selection_is_neutral() {
    let portfolio = aggregate(&[]);
    assert_eq!(portfolio.baseline_risk, 0.0);
    assert_eq!(portfolio.total_volume, 0.0);
    assert_eq!(portfolio.concentration, 1.0);
}

#[test]
fn test_zero_baseline_guards_concentration() {
    // Positive volume but all scores zero: baseline 0, concentration
    // must not divide by zero.
    let selection = vec![selected("AAA", 10.0, 0.0), selected("BBB", 20.0, 0.0)];
    let portfolio = aggregate(&selection);
    assert_eq!(portfolio.baseline_risk, 0.0);
    assert_eq!(portfolio.concentration, 1.0);
}

#[test]
fn test_zero_volume_regions_are_ignored() {
    let selection = vec![selected("AAA", 0.0, 99.0), selected("BBB", 10.0, 40.0)];
    let portfolio = aggregate(&selection);
    assert!((portfolio.baseline_risk - 40.0).abs() < 1e-9);
    assert!((portfolio.total_volume - 10.0).abs() < 1e-9);
}

#[test]
fn test_missing_volume_defaults() {
    let region = SelectedRegion::new("AAA", None, 55.0);
    assert_eq!(region.volume, DEFAULT_REGION_VOLUME);
    let region = SelectedRegion::new("AAA", Some(3.0), 55.0);
    assert_eq!(region.volume, 3.0);
}
