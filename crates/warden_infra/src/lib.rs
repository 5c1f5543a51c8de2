#![forbid(unsafe_code)]

pub mod profile;

pub fn infra_bootstrapped() -> bool {
    warden_core::crate_bootstrapped()
}
