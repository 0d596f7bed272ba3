//! Error types for regtune-store

use std::path::PathBuf;

/// Result type for regtune-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in regtune-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} document at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} document for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Unrecognized root key: {root}")]
    UnknownRoot { root: String },

    #[error("Invalid user SID pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Access denied to {path}")]
    AccessDenied { path: String },

    #[error("Registry {op} failed at {path}: {source}")]
    Registry {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Map a backend I/O failure, keeping permission problems distinguishable.
    pub fn registry(op: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::AccessDenied { path }
        } else {
            Self::Registry { op, path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_maps_to_access_denied() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = Error::registry("write", r"HKEY_LOCAL_MACHINE\SYSTEM", source);
        assert!(matches!(err, Error::AccessDenied { .. }));
        assert!(err.to_string().contains("SYSTEM"));
    }

    #[test]
    fn test_other_failures_keep_operation() {
        let source = std::io::Error::other("disk on fire");
        let err = Error::registry("delete", r"HKEY_USERS\S-1-5-21-1", source);
        assert!(err.to_string().contains("delete"));
        assert!(err.to_string().contains("disk on fire"));
    }
}
