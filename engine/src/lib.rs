//! Gravity Module Library
//!
//! Ballistic motion for procedural objects inside an editor host: an object
//! (and optionally the rest of its group) falls under constant gravity,
//! rebounds off the ground, and can loop forever at an adjustable time
//! scale. State survives save/load through a flat key/value map.
//!
//! # Modules
//!
//! - [`physics`] - Single-step ballistic integration with ground rebound
//! - [`world`] - Host capability trait, ground queries and an in-memory host
//! - [`game`] - Trajectory config, state, simulator and persistence
//!
//! # Example
//!
//! ```ignore
//! use gravity_module_engine::{FrameContext, SandboxWorld, TrajectorySimulator};
//! use glam::Vec3;
//!
//! let mut world = SandboxWorld::flat(0.0);
//! let ball = world.spawn(Vec3::new(0.0, 10.0, 0.0));
//!
//! let mut sim = TrajectorySimulator::new(ball);
//! sim.config.rebound_factor = 0.8;
//! sim.activate(&mut world)?;
//!
//! // Once per host frame
//! sim.update(&mut world, FrameContext::running(1.0 / 60.0))?;
//!
//! // Save game
//! let data = sim.export();
//! ```

pub mod physics;
pub mod world;

// Trajectory module (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export the commonly used types at crate level for convenience
pub use game::{
    ContactEvent, FrameOutcome, ModuleData, ModuleDataError, TrajectoryConfig, TrajectoryError,
    TrajectorySimulator, TrajectoryState,
};
pub use physics::{BallisticsParams, BodyStep, TrajectoryBody};
pub use world::{FlatGround, FrameContext, GroundQuery, ObjectId, SandboxWorld, TrajectoryHost};
