//! Persistence Module
//!
//! Save/load of trajectory modules: the host's flat key/value map and a
//! JSON snapshot file wrapper around it.

pub mod module_data;
pub mod snapshot;

pub use module_data::{
    LIST_SEPARATOR, ModuleData, export_config, export_module, export_state, import_module, keys,
};
pub use snapshot::{load_module_data, save_module_data};
