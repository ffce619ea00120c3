//! Host capability interface
//!
//! Everything the trajectory simulator needs from the editor it runs in:
//! per-object positions, group membership and the ground query. The host
//! owns all of it; the simulator only reads and writes through this trait.

use glam::Vec3;

use super::GroundQuery;

/// Opaque handle to a host object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object #{}", self.0)
    }
}

/// Object storage and group model exposed by the host.
pub trait TrajectoryHost: GroundQuery {
    /// Current position of `object`, or `None` if the host does not know it.
    fn position(&self, object: ObjectId) -> Option<Vec3>;

    /// Move `object` to `position`. Unknown objects are ignored.
    fn set_position(&mut self, object: ObjectId, position: Vec3);

    /// Whether `object` is the root of the group it belongs to.
    fn is_group_root(&self, object: ObjectId) -> bool;

    /// Other members of `object`'s group, excluding `object` itself.
    ///
    /// Returns `None` when the object has no group. The order must be
    /// stable between calls as long as membership does not change.
    fn group_siblings(&self, object: ObjectId) -> Option<Vec<ObjectId>>;
}

/// Per-frame inputs handed over by the host update hook.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Real time elapsed since the previous frame (seconds)
    pub delta: f32,
    /// Host simulation is paused
    pub simulation_paused: bool,
    /// The layer holding the object is visible
    pub layer_visible: bool,
}

impl FrameContext {
    /// A running, visible frame.
    pub fn running(delta: f32) -> Self {
        Self {
            delta,
            simulation_paused: false,
            layer_visible: true,
        }
    }

    /// A frame with the host simulation paused.
    pub fn paused(delta: f32) -> Self {
        Self {
            simulation_paused: true,
            ..Self::running(delta)
        }
    }

    /// A frame where the object's layer is hidden.
    pub fn hidden(delta: f32) -> Self {
        Self {
            layer_visible: false,
            ..Self::running(delta)
        }
    }

    /// True when time should not advance this frame.
    pub fn is_frozen(&self) -> bool {
        self.simulation_paused || !self.layer_visible
    }
}
