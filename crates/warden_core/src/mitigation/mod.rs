//! Mitigation effectiveness and managed risk.

pub mod detection;
pub mod managed_risk;
pub mod response;

pub use detection::detection_effectiveness;
pub use managed_risk::{
    ManagedRiskInput, ManagedRiskMetrics, ManagedRiskOutcome, RegionManagedRisk, managed_risk,
};
pub use response::response_effectiveness;
