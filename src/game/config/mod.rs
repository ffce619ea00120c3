//! Config Module
//!
//! User-editable trajectory parameters.

pub mod trajectory_config;

pub use trajectory_config::{
    ConfigField, MAX_TIME_SPEED, MIN_TIME_SPEED, MOON_GRAVITY, STANDARD_GRAVITY,
    TrajectoryConfig, UNLIMITED_REBOUNDS,
};
