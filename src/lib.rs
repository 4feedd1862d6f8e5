pub mod autopilot;
pub mod constants;
pub mod engine;
pub mod levels;
pub mod logging;
pub mod maze;
pub mod motion;
pub mod rng;
pub mod types;
