//! Module Data (flat key/value persistence)
//!
//! The host saves each module as a flat `String -> String` map. Scalars are
//! written in their shortest round-trip text form, vectors as `(x, y, z)`,
//! booleans as `True`/`False`, and follower lists as `|`-joined entries.
//!
//! Loading is tolerant of missing keys (they keep their current value) and
//! strict about malformed values: one bad value rejects the whole map and
//! nothing is applied.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::game::config::TrajectoryConfig;
use crate::game::error::ModuleDataError;
use crate::game::state::TrajectoryState;

/// Persisted key/value bag of one module.
pub type ModuleData = BTreeMap<String, String>;

/// Separator between entries of a persisted list.
pub const LIST_SEPARATOR: char = '|';

/// Persisted key names.
pub mod keys {
    pub const REPEAT: &str = "repeat";
    pub const STATE: &str = "state";
    pub const TIME_SPEED: &str = "timeSpeed";
    pub const GRAVITY: &str = "gravity";
    pub const INITIAL_SPEED: &str = "initialSpeed";
    pub const BOUNCE_TIMES: &str = "bounceTimes";
    pub const BOUNCE_FACTOR: &str = "bounceFactor";
    pub const GROUP_FOLLOWS: &str = "groupFollows";
    pub const REST_POSITION: &str = "point0";
    pub const REMAINING_REBOUNDS: &str = "t";
    pub const VERTICAL_VELOCITY: &str = "vy";
    pub const FOLLOWER_POSITIONS: &str = "points";
    pub const FOLLOWER_VELOCITIES: &str = "vys";

    /// Names used by saves from before the rebound -> bounce rename.
    pub const LEGACY_REBOUND_TIMES: &str = "reboundTimes";
    pub const LEGACY_REBOUND_FACTOR: &str = "reboundFactor";
}

// ============================================================================
// TEXT FORMATS
// ============================================================================

pub fn format_float(value: f32) -> String {
    value.to_string()
}

pub fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

pub fn format_vec3(v: Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

pub fn format_vec3_list(values: &[Vec3]) -> String {
    join_list(values.iter().map(|&v| format_vec3(v)))
}

pub fn format_float_list(values: &[f32]) -> String {
    join_list(values.iter().map(|&v| format_float(v)))
}

fn join_list(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(&LIST_SEPARATOR.to_string())
}

pub fn parse_float(key: &str, text: &str) -> Result<f32, ModuleDataError> {
    text.trim()
        .parse::<f32>()
        .map_err(|_| ModuleDataError::InvalidFloat {
            key: key.to_string(),
            value: text.to_string(),
        })
}

pub fn parse_int(key: &str, text: &str) -> Result<i32, ModuleDataError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| ModuleDataError::InvalidInteger {
            key: key.to_string(),
            value: text.to_string(),
        })
}

/// Case-insensitive `true` / `false`.
pub fn parse_bool(key: &str, text: &str) -> Result<bool, ModuleDataError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ModuleDataError::InvalidBool {
            key: key.to_string(),
            value: text.to_string(),
        })
    }
}

/// Parse `(x, y, z)`; the parentheses are optional.
pub fn parse_vec3(key: &str, text: &str) -> Result<Vec3, ModuleDataError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed);

    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 3 {
        return Err(ModuleDataError::VectorComponents {
            key: key.to_string(),
            value: text.to_string(),
            found: parts.len(),
        });
    }

    Ok(Vec3::new(
        parse_float(key, parts[0])?,
        parse_float(key, parts[1])?,
        parse_float(key, parts[2])?,
    ))
}

/// Parse a `|`-joined list, skipping empty entries.
pub fn parse_list<T>(
    key: &str,
    text: &str,
    parse: impl Fn(&str, &str) -> Result<T, ModuleDataError>,
) -> Result<Vec<T>, ModuleDataError> {
    text.split(LIST_SEPARATOR)
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| parse(key, entry))
        .collect()
}

// ============================================================================
// EXPORT
// ============================================================================

/// Write the config keys into `data`.
pub fn export_config(config: &TrajectoryConfig, data: &mut ModuleData) {
    let mut put = |key: &str, value: String| {
        data.insert(key.to_string(), value);
    };
    put(keys::REPEAT, format_bool(config.repeat_on_finish));
    put(keys::TIME_SPEED, format_float(config.time_speed));
    put(keys::GRAVITY, format_float(config.gravity));
    put(keys::INITIAL_SPEED, format_vec3(config.initial_speed));
    put(keys::BOUNCE_TIMES, config.rebound_count.to_string());
    put(keys::BOUNCE_FACTOR, format_float(config.rebound_factor));
    put(keys::GROUP_FOLLOWS, format_bool(config.group_follows));
}

/// Write the state keys into `data`.
pub fn export_state(state: &TrajectoryState, data: &mut ModuleData) {
    let mut put = |key: &str, value: String| {
        data.insert(key.to_string(), value);
    };
    put(keys::STATE, format_bool(state.active));
    put(keys::REST_POSITION, format_vec3(state.rest_position));
    put(keys::REMAINING_REBOUNDS, state.remaining_rebounds.to_string());
    put(keys::VERTICAL_VELOCITY, format_float(state.vertical_velocity));
    put(
        keys::FOLLOWER_POSITIONS,
        format_vec3_list(&state.follower_rest_positions),
    );
    put(
        keys::FOLLOWER_VELOCITIES,
        format_float_list(&state.follower_velocities),
    );
}

/// Full state-preserving export: every config and state key.
pub fn export_module(config: &TrajectoryConfig, state: &TrajectoryState) -> ModuleData {
    let mut data = ModuleData::new();
    export_config(config, &mut data);
    export_state(state, &mut data);
    data
}

// ============================================================================
// IMPORT
// ============================================================================

fn read<T>(
    data: &ModuleData,
    key: &str,
    parse: impl Fn(&str, &str) -> Result<T, ModuleDataError>,
) -> Result<Option<T>, ModuleDataError> {
    data.get(key).map(|text| parse(key, text.as_str())).transpose()
}

fn read_list<T>(
    data: &ModuleData,
    key: &str,
    parse: impl Fn(&str, &str) -> Result<T, ModuleDataError>,
) -> Result<Option<Vec<T>>, ModuleDataError> {
    data.get(key)
        .map(|text| parse_list(key, text.as_str(), &parse))
        .transpose()
}

/// Apply every key present in `data` to `config` and `state`.
///
/// All values are parsed before anything is written; on error both targets
/// are left exactly as they were.
pub fn import_module(
    data: &ModuleData,
    config: &mut TrajectoryConfig,
    state: &mut TrajectoryState,
) -> Result<(), ModuleDataError> {
    let mut next_config = *config;
    let mut next_state = state.clone();

    if let Some(v) = read(data, keys::REPEAT, parse_bool)? {
        next_config.repeat_on_finish = v;
    }
    if let Some(v) = read(data, keys::STATE, parse_bool)? {
        next_state.active = v;
    }
    if let Some(v) = read(data, keys::TIME_SPEED, parse_float)? {
        next_config.time_speed = v;
    }
    if let Some(v) = read(data, keys::GRAVITY, parse_float)? {
        next_config.gravity = v;
    }
    if let Some(v) = read(data, keys::INITIAL_SPEED, parse_vec3)? {
        next_config.initial_speed = v;
    }

    // Current names win over the legacy ones
    let rebound_count = match read(data, keys::BOUNCE_TIMES, parse_int)? {
        Some(v) => Some(v),
        None => read(data, keys::LEGACY_REBOUND_TIMES, parse_int)?,
    };
    if let Some(v) = rebound_count {
        next_config.rebound_count = v;
    }
    let rebound_factor = match read(data, keys::BOUNCE_FACTOR, parse_float)? {
        Some(v) => Some(v),
        None => read(data, keys::LEGACY_REBOUND_FACTOR, parse_float)?,
    };
    if let Some(v) = rebound_factor {
        next_config.rebound_factor = v;
    }

    if let Some(v) = read(data, keys::GROUP_FOLLOWS, parse_bool)? {
        next_config.group_follows = v;
    }
    if let Some(v) = read(data, keys::REST_POSITION, parse_vec3)? {
        next_state.rest_position = v;
    }
    if let Some(v) = read(data, keys::REMAINING_REBOUNDS, parse_int)? {
        next_state.remaining_rebounds = v;
    }
    if let Some(v) = read(data, keys::VERTICAL_VELOCITY, parse_float)? {
        next_state.vertical_velocity = v;
    }
    if let Some(v) = read_list(data, keys::FOLLOWER_POSITIONS, parse_vec3)? {
        next_state.follower_rest_positions = v;
    }
    if let Some(v) = read_list(data, keys::FOLLOWER_VELOCITIES, parse_float)? {
        next_state.follower_velocities = v;
    }

    *config = next_config;
    *state = next_state;
    Ok(())
}
