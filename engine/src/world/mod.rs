//! World Module
//!
//! The host-side collaborators the trajectory simulator reads and writes:
//! ground height queries, object positions and object groups.
//!
//! The simulator never owns host objects. It talks to them through the
//! [`TrajectoryHost`] capability trait, which a real editor implements over
//! its own object records and [`SandboxWorld`] implements in memory.

pub mod ground;
pub mod host;
pub mod sandbox;

pub use ground::{FlatGround, GroundQuery, SlopedGround};
pub use host::{FrameContext, ObjectId, TrajectoryHost};
pub use sandbox::SandboxWorld;
