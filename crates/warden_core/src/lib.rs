#![forbid(unsafe_code)]

pub mod assessment;
pub mod config;
pub mod cost;
pub mod focus;
pub mod mitigation;
pub mod optimize;
pub mod scoring;

pub fn crate_bootstrapped() -> bool {
    true
}
