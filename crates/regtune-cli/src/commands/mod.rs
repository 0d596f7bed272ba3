//! Command implementations for regtune-cli

pub mod apply;
pub mod list;
pub mod profile;

pub use apply::{ApplyArgs, run_apply, run_refresh};
pub use list::{run_list, run_presets, run_search};
pub use profile::run_export;
