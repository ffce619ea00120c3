//! Ballistic step for trajectory bodies
//!
//! One explicit Euler step of vertical free fall with constant horizontal
//! drift and a ground rebound. Shared by the parent object and every group
//! follower; the rebound budget is tracked by the caller, not here.
//!
//! # Example
//!
//! ```ignore
//! use gravity_module_engine::physics::ballistics::{BallisticsParams, BodyStep, TrajectoryBody};
//! use gravity_module_engine::world::FlatGround;
//! use glam::Vec3;
//!
//! let params = BallisticsParams::default();
//! let mut body = TrajectoryBody::new(Vec3::new(0.0, 10.0, 0.0), 0.0);
//! let ground = FlatGround::new(0.0);
//!
//! if let BodyStep::Rebounded { ground_height } = body.step(&params, 1.0 / 60.0, &ground) {
//!     println!("bounced off ground at {ground_height}");
//! }
//! ```

use glam::Vec3;

use crate::world::GroundQuery;

/// Vertical speed (m/s) below which a rebound counts as settled.
///
/// Lets lossy bounces with an unlimited budget terminate instead of
/// producing an endless series of vanishing hops.
pub const SETTLE_SPEED: f32 = 0.1;

/// Physical parameters for a single ballistic step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticsParams {
    /// Downward acceleration (m/s²), subtracted from vertical velocity.
    pub gravity: f32,
    /// Horizontal drift velocity (m/s). Only `x` and `z` are used.
    pub drift: Vec3,
    /// Fraction of vertical speed kept (sign-flipped) after a ground contact.
    pub rebound_factor: f32,
}

impl Default for BallisticsParams {
    fn default() -> Self {
        Self {
            gravity: 9.807,
            drift: Vec3::ZERO,
            rebound_factor: 1.0,
        }
    }
}

/// A body moving along a ballistic trajectory.
///
/// `position` mirrors the host object's position for the duration of a step;
/// `vertical_velocity` is owned by the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryBody {
    /// World-space position (meters)
    pub position: Vec3,
    /// Vertical speed (m/s), positive is up
    pub vertical_velocity: f32,
}

/// Result of a single [`TrajectoryBody::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyStep {
    /// Body stayed above the ground surface
    Airborne,
    /// Body crossed below the ground and was reflected
    Rebounded {
        /// Ground height sampled under the body at contact (meters)
        ground_height: f32,
    },
}

impl TrajectoryBody {
    pub fn new(position: Vec3, vertical_velocity: f32) -> Self {
        Self {
            position,
            vertical_velocity,
        }
    }

    /// Advance the body by `dt` seconds.
    ///
    /// Semi-implicit Euler on the vertical axis:
    /// - x, z += dt * drift
    /// - v -= gravity * dt
    /// - y += dt * v
    ///
    /// On ground contact the vertical displacement is reverted with the
    /// already-updated velocity, so the body is not clamped exactly onto the
    /// surface. The velocity is then reflected and scaled by the rebound factor.
    pub fn step<G: GroundQuery + ?Sized>(
        &mut self,
        params: &BallisticsParams,
        dt: f32,
        ground: &G,
    ) -> BodyStep {
        self.position.x += dt * params.drift.x;
        self.position.z += dt * params.drift.z;

        self.vertical_velocity = self.vertical_velocity - params.gravity * dt;
        self.position.y += dt * self.vertical_velocity;

        let ground_height = ground.ground_height(self.position);
        if self.position.y < ground_height {
            self.position.y -= dt * self.vertical_velocity;
            self.vertical_velocity = -self.vertical_velocity * params.rebound_factor;
            return BodyStep::Rebounded { ground_height };
        }

        BodyStep::Airborne
    }

    /// True when the vertical speed is below [`SETTLE_SPEED`].
    pub fn is_settled(&self) -> bool {
        self.vertical_velocity.abs() < SETTLE_SPEED
    }
}
