//! Game systems: self-contained modules that own state and logic.

pub mod trajectory_system;

pub use trajectory_system::{ContactEvent, FrameOutcome, TrajectorySimulator};
