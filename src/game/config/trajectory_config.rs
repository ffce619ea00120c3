//! Trajectory Configuration
//!
//! User-editable parameters of one trajectory module. Every field is a plain
//! public value so an external parameter editor can change it live between
//! frames; the setters below only exist for editor widgets that need the
//! same quantization and text tolerance as the in-game panel.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::BallisticsParams;

/// Standard gravity (m/s²).
pub const STANDARD_GRAVITY: f32 = 9.807;

/// Lunar surface gravity (m/s²).
pub const MOON_GRAVITY: f32 = 1.62;

/// Rebound count meaning "never runs out".
pub const UNLIMITED_REBOUNDS: i32 = -1;

/// Editor range for the time multiplier.
pub const MIN_TIME_SPEED: f32 = 0.1;
pub const MAX_TIME_SPEED: f32 = 10.0;

/// Parameters of one ballistic trajectory module.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrajectoryConfig {
    /// Downward acceleration (m/s²). Not validated; zero or negative values
    /// give floating or diverging trajectories.
    pub gravity: f32,
    /// x/z: constant horizontal drift (m/s). y: launch and relaunch vertical speed.
    pub initial_speed: Vec3,
    /// Rebounds allowed before the run finishes.
    /// `-1` unlimited, `0` finish on first contact.
    pub rebound_count: i32,
    /// Vertical speed kept after each contact. `1.0` is perfectly elastic,
    /// values above 1 gain energy.
    pub rebound_factor: f32,
    /// Multiplier on real elapsed time.
    pub time_speed: f32,
    /// Loop back to the rest position when the run finishes, instead of
    /// freezing in place and going idle.
    pub repeat_on_finish: bool,
    /// Other members of the parent's group replicate the motion.
    pub group_follows: bool,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
            initial_speed: Vec3::ZERO,
            rebound_count: UNLIMITED_REBOUNDS,
            rebound_factor: 1.0,
            time_speed: 1.0,
            repeat_on_finish: true,
            group_follows: false,
        }
    }
}

/// Numeric fields an editor exposes as text boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    Gravity,
    InitialSpeedX,
    InitialSpeedY,
    InitialSpeedZ,
    ReboundCount,
    ReboundFactor,
}

impl TrajectoryConfig {
    /// Earth defaults.
    pub fn earth() -> Self {
        Self::default()
    }

    /// Lunar gravity, otherwise default.
    pub fn moon() -> Self {
        Self::with_gravity(MOON_GRAVITY)
    }

    /// Custom gravity, otherwise default.
    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Step parameters for [`crate::physics::TrajectoryBody::step`].
    pub fn ballistics(&self) -> BallisticsParams {
        BallisticsParams {
            gravity: self.gravity,
            drift: Vec3::new(self.initial_speed.x, 0.0, self.initial_speed.z),
            rebound_factor: self.rebound_factor,
        }
    }

    /// True when the rebound budget never runs out.
    pub fn has_unlimited_rebounds(&self) -> bool {
        self.rebound_count < 0
    }

    /// Set the time multiplier the way the editor slider does:
    /// truncated to 0.1 steps and clamped to [0.1, 10.0].
    pub fn set_time_speed(&mut self, value: f32) {
        let tenths = (value * 10.0).clamp(MIN_TIME_SPEED * 10.0, MAX_TIME_SPEED * 10.0);
        self.time_speed = tenths.floor() / 10.0;
    }

    /// Set one component of the initial speed (0 = x, 1 = y, 2 = z).
    /// Out-of-range axes are ignored.
    pub fn set_initial_speed_axis(&mut self, axis: usize, value: f32) {
        if axis < 3 {
            self.initial_speed[axis] = value;
        }
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat_on_finish = !self.repeat_on_finish;
    }

    /// Apply editor text to a numeric field.
    ///
    /// Text that does not parse leaves the field unchanged; returns whether
    /// the value was applied.
    pub fn apply_text(&mut self, field: ConfigField, text: &str) -> bool {
        let text = text.trim();
        if let Some(slot) = self.float_field_mut(field) {
            return match text.parse::<f32>() {
                Ok(value) => {
                    *slot = value;
                    true
                }
                Err(_) => false,
            };
        }

        match text.parse::<i32>() {
            Ok(count) => {
                self.rebound_count = count;
                true
            }
            Err(_) => false,
        }
    }

    fn float_field_mut(&mut self, field: ConfigField) -> Option<&mut f32> {
        match field {
            ConfigField::Gravity => Some(&mut self.gravity),
            ConfigField::InitialSpeedX => Some(&mut self.initial_speed.x),
            ConfigField::InitialSpeedY => Some(&mut self.initial_speed.y),
            ConfigField::InitialSpeedZ => Some(&mut self.initial_speed.z),
            ConfigField::ReboundFactor => Some(&mut self.rebound_factor),
            ConfigField::ReboundCount => None,
        }
    }
}
