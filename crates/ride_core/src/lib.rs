pub mod auth;
pub mod clock;
pub mod directory;
pub mod ecs;
pub mod fleet;
pub mod geo;
pub mod history;
pub mod pricing;
pub mod rides;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod spatial;
pub mod speed;
pub mod systems;
pub mod telemetry;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
