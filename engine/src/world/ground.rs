//! Ground height queries
//!
//! The ground is a height field: for any point, the host reports the height
//! of the nearest surface directly below or at its horizontal position.

use glam::Vec3;

/// Samples the ground surface height under a point.
pub trait GroundQuery {
    /// Height (Y, meters) of the ground at `point`'s horizontal position.
    fn ground_height(&self, point: Vec3) -> f32;
}

impl<F> GroundQuery for F
where
    F: Fn(Vec3) -> f32,
{
    fn ground_height(&self, point: Vec3) -> f32 {
        self(point)
    }
}

/// Horizontal ground plane at a fixed height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Default for FlatGround {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl GroundQuery for FlatGround {
    fn ground_height(&self, _point: Vec3) -> f32 {
        self.height
    }
}

/// Tilted ground plane: `height = base + slope_x * x + slope_z * z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopedGround {
    /// Height at the world origin (meters)
    pub base: f32,
    /// Rise per meter along +X
    pub slope_x: f32,
    /// Rise per meter along +Z
    pub slope_z: f32,
}

impl SlopedGround {
    pub fn new(base: f32, slope_x: f32, slope_z: f32) -> Self {
        Self {
            base,
            slope_x,
            slope_z,
        }
    }
}

impl GroundQuery for SlopedGround {
    fn ground_height(&self, point: Vec3) -> f32 {
        self.base + self.slope_x * point.x + self.slope_z * point.z
    }
}
