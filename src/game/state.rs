//! Trajectory State
//!
//! Transient simulation state of one trajectory module. Persisted alongside
//! the config so a saved game resumes mid-flight.

use glam::Vec3;

/// Runtime state of a trajectory module.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryState {
    /// Simulation running (`true`) or tracking the rest position (`false`)
    pub active: bool,
    /// Parent position captured while idle; frozen while active
    pub rest_position: Vec3,
    /// Rebounds left before the run finishes. Negative never decrements.
    pub remaining_rebounds: i32,
    /// Parent vertical speed (m/s); meaningless while idle
    pub vertical_velocity: f32,

    // === Group follow ===
    /// Follower positions captured on enable/activation, index-aligned with
    /// the host's sibling enumeration at capture time
    pub follower_rest_positions: Vec<Vec3>,
    /// Follower vertical speeds, aligned with `follower_rest_positions`
    pub follower_velocities: Vec<f32>,
}

impl Default for TrajectoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrajectoryState {
    /// Idle state with nothing captured.
    pub fn new() -> Self {
        Self {
            active: false,
            rest_position: Vec3::ZERO,
            remaining_rebounds: 0,
            vertical_velocity: 0.0,
            follower_rest_positions: Vec::new(),
            follower_velocities: Vec::new(),
        }
    }

    /// Number of captured followers.
    pub fn follower_count(&self) -> usize {
        self.follower_rest_positions.len()
    }

    /// True when both follower lists match `siblings` entries.
    pub fn followers_aligned(&self, siblings: usize) -> bool {
        self.follower_rest_positions.len() == siblings && self.follower_velocities.len() == siblings
    }
}
