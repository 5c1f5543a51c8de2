//! Region risk scoring and portfolio aggregation.

pub mod indicator;
pub mod portfolio;

pub use indicator::{Region, weighted_score};
pub use portfolio::{PortfolioAssessment, SelectedRegion, aggregate};
