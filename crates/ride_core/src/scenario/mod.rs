//! Demo scenario setup: parameters and world building.

mod build;
mod params;

pub use build::build_demo;
pub use params::{DemoParams, DwellConfig, MovementConfig};
