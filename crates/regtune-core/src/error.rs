//! Error types for regtune-core

use std::path::PathBuf;

/// Result type for regtune-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in regtune-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The interpreter for a shell command could not be started
    #[error("Failed to start `{line}`: {source}")]
    Spawn {
        line: String,
        #[source]
        source: std::io::Error,
    },

    /// Another apply or refresh holds the catalog
    #[error("A reconciliation is already in progress")]
    ReconcileInProgress,

    /// The background apply worker panicked or was cancelled
    #[error("Background worker failed: {0}")]
    WorkerJoin(String),

    /// Settings file exists but is invalid
    #[error("Invalid settings in {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    /// An explicitly requested settings file does not exist
    #[error("Settings not found at {path}")]
    ConfigNotFound { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Store error from regtune-store
    #[error(transparent)]
    Store(#[from] regtune_store::Error),

    /// Catalog error from regtune-catalog
    #[error(transparent)]
    Catalog(#[from] regtune_catalog::Error),
}
