//! Error types for the trajectory module.
//!
//! [`ModuleDataError`] covers loading a persisted key/value map;
//! [`TrajectoryError`] covers everything that can fail while the simulator
//! talks to its host or to snapshot files.

use std::fmt;

use crate::world::ObjectId;

// ============================================================================
// MODULE DATA
// ============================================================================

/// A persisted value could not be parsed. The whole load is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDataError {
    /// Value is not a floating point number.
    InvalidFloat { key: String, value: String },
    /// Value is not an integer.
    InvalidInteger { key: String, value: String },
    /// Value is neither `true` nor `false` (any case).
    InvalidBool { key: String, value: String },
    /// Vector text does not have exactly three components.
    VectorComponents {
        key: String,
        value: String,
        found: usize,
    },
}

impl fmt::Display for ModuleDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleDataError::InvalidFloat { key, value } => {
                write!(f, "key '{key}': invalid number '{value}'")
            }
            ModuleDataError::InvalidInteger { key, value } => {
                write!(f, "key '{key}': invalid integer '{value}'")
            }
            ModuleDataError::InvalidBool { key, value } => {
                write!(f, "key '{key}': invalid boolean '{value}'")
            }
            ModuleDataError::VectorComponents { key, value, found } => write!(
                f,
                "key '{key}': expected 3 vector components, found {found} in '{value}'"
            ),
        }
    }
}

impl std::error::Error for ModuleDataError {}

// ============================================================================
// SIMULATOR
// ============================================================================

/// Errors raised by the trajectory simulator and its snapshot helpers.
#[derive(Debug)]
pub enum TrajectoryError {
    /// The host does not know an object the simulator needs.
    UnknownObject(ObjectId),
    /// Captured follower data no longer lines up with the host's group,
    /// usually because membership changed after capture.
    FollowerMismatch {
        captured: usize,
        velocities: usize,
        siblings: usize,
    },
    /// Persisted module data could not be parsed.
    Data(ModuleDataError),
    /// Snapshot file I/O failed.
    Io(std::io::Error),
    /// Snapshot JSON could not be encoded or decoded.
    Json(serde_json::Error),
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrajectoryError::UnknownObject(id) => write!(f, "host has no {id}"),
            TrajectoryError::FollowerMismatch {
                captured,
                velocities,
                siblings,
            } => write!(
                f,
                "follower data out of sync with group: {captured} positions, \
                 {velocities} velocities, {siblings} siblings"
            ),
            TrajectoryError::Data(e) => write!(f, "module data error: {e}"),
            TrajectoryError::Io(e) => write!(f, "IO error: {e}"),
            TrajectoryError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for TrajectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrajectoryError::Data(e) => Some(e),
            TrajectoryError::Io(e) => Some(e),
            TrajectoryError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModuleDataError> for TrajectoryError {
    fn from(e: ModuleDataError) -> Self {
        TrajectoryError::Data(e)
    }
}

impl From<std::io::Error> for TrajectoryError {
    fn from(e: std::io::Error) -> Self {
        TrajectoryError::Io(e)
    }
}

impl From<serde_json::Error> for TrajectoryError {
    fn from(e: serde_json::Error) -> Self {
        TrajectoryError::Json(e)
    }
}
