//! Key/value store abstraction for regtune
//!
//! Provides root-qualified key path parsing, hive alias resolution with
//! user-context redirection, typed value coercion, and the storage
//! backends the reconciliation engine reads from and writes to.

pub mod config;
pub mod error;
pub mod hive;
pub mod io;
pub mod memory;
pub mod path;
pub mod store;
pub mod value;

#[cfg(windows)]
pub mod windows;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use hive::Hive;
pub use memory::MemoryBackend;
pub use path::{KeyPath, SEPARATOR, resolve};
pub use store::{KeyValueStore, RegistryBackend, RegistryStore, RootHandle, UserContext};
pub use value::{RegValue, ValueKind, text_matches, value_matches};

#[cfg(windows)]
pub use windows::WindowsBackend;
