//! Physics module
//!
//! Ballistic motion for procedural objects, built without an external
//! physics library.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//!
//! The world is flat and Y-up: gravity acts along -Y and the ground is a
//! height field sampled under each body.
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`ballistics`] - Single-step free fall with ground rebound

pub mod ballistics;
pub mod types;

pub use ballistics::{BallisticsParams, BodyStep, SETTLE_SPEED, TrajectoryBody};
pub use types::Vec3;
