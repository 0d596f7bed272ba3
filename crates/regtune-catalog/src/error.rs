//! Error types for regtune-catalog

/// Result type for regtune-catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in regtune-catalog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] regtune_store::Error),

    #[error("Failed to parse {format} definitions from {source_name}: {message}")]
    DefinitionParse {
        source_name: String,
        format: String,
        message: String,
    },

    #[error("Malformed profile: {message}")]
    ProfileFormat { message: String },

    #[error("Item not found: {title}")]
    ItemNotFound { title: String },

    #[error("Item '{title}' is locked and cannot be changed")]
    ItemLocked { title: String },

    #[error("Unknown item class: {0}")]
    UnknownClass(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_parse_display() {
        let err = Error::DefinitionParse {
            source_name: "legacy.toml".into(),
            format: "TOML".into(),
            message: "expected `=`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("legacy.toml"));
        assert!(msg.contains("TOML"));
    }
}
