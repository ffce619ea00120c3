//! Game Module
//!
//! The trajectory module itself, built on top of the engine's physics step
//! and host interface: parameters, runtime state, the per-frame simulator
//! and save/load.

pub mod config;
pub mod error;
pub mod persistence;
pub mod state;
pub mod systems;

pub use config::{ConfigField, TrajectoryConfig};
pub use error::{ModuleDataError, TrajectoryError};
pub use persistence::{ModuleData, load_module_data, save_module_data};
pub use state::TrajectoryState;
pub use systems::{ContactEvent, FrameOutcome, TrajectorySimulator};
