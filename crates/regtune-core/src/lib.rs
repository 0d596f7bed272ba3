//! Reconciliation engine and session orchestration for regtune
//!
//! This crate provides:
//!
//! - [`ReconciliationEngine`]: check, apply, refresh and preset selection
//!   over a [`regtune_store::KeyValueStore`]
//! - [`CommandRunner`] and the process-backed [`ShellRunner`]
//! - [`Session`]: single-operation access to a catalog, with background apply
//! - [`Settings`]: `regtune.toml` configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod runner;
pub mod session;

pub use config::{DefinitionPaths, EngineSettings, Settings, UserContextSettings};
pub use engine::{
    ApplyReport, ChangeKind, EngineOptions, ItemFailure, PendingChange, ReconciliationEngine,
};
pub use error::{Error, Result};
pub use runner::{CommandRunner, ShellRunner};
pub use session::Session;
