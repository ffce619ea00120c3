//! Snapshot files
//!
//! Writes a module's persisted key/value map to a pretty-printed JSON
//! object on disk and reads it back, the way a host save game would
//! store it.

use std::path::Path;

use tracing::info;

use super::module_data::ModuleData;
use crate::game::error::TrajectoryError;

/// Save `data` as JSON at `path`, creating parent directories.
pub fn save_module_data(path: &Path, data: &ModuleData) -> Result<(), TrajectoryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), keys = data.len(), "saved module snapshot");
    Ok(())
}

/// Load a JSON snapshot written by [`save_module_data`].
pub fn load_module_data(path: &Path) -> Result<ModuleData, TrajectoryError> {
    let json = std::fs::read_to_string(path)?;
    let data: ModuleData = serde_json::from_str(&json)?;
    info!(path = %path.display(), keys = data.len(), "loaded module snapshot");
    Ok(data)
}
