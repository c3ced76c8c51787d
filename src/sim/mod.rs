//! Level simulation module
//!
//! All gameplay logic lives here:
//! - One update per displayed frame (no fixed timestep)
//! - Stable iteration order (obstacle list order decides collisions)
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod input;
pub mod motion;
pub mod simulation;

pub use entity::{Body, Character, EntityRef, Exit, Obstacle, ObstacleKind, Torch};
pub use geometry::{Rect, overlaps};
pub use input::{Key, KeyState};
pub use motion::Oscillation;
pub use simulation::{Contact, Simulation, TickOutcome};
