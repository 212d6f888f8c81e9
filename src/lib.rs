//! Tilt Shooter - a tilt-steered arcade shooter
//!
//! Core modules:
//! - `entities`: plain game data
//! - `compute`: pure state transitions (tilt, fire, advance, collisions)
//! - `scheduler`: the simulation context and its fixed-interval tasks
//! - `input`: tilt sample sources
//! - `settings`: tunables, loaded from JSON

pub mod compute;
pub mod entities;
pub mod input;
pub mod scheduler;
pub mod settings;

pub use entities::{GameState, SessionState, TiltSample};
pub use scheduler::{Simulation, Task};
pub use settings::{ConfigError, Settings};
