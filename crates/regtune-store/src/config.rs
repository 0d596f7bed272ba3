//! Format-agnostic document loading

use crate::{Error, Result, io};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Serialization format of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from a file extension:
    /// `.toml`, `.json`, `.yaml`/`.yml`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// Deserialize `content`, returning the parser's message on failure.
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Format-agnostic document store.
///
/// Detects the format from the file extension and deserializes
/// transparently.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = Format::from_path(path)?;
        let content = io::read_text(path)?;
        format.parse(&content).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Doc {
        name: String,
        flags: BTreeMap<String, bool>,
    }

    fn sample() -> Doc {
        Doc {
            name: "sample".into(),
            flags: BTreeMap::from([("a".to_string(), true), ("b".to_string(), false)]),
        }
    }

    #[test]
    fn test_detects_formats() {
        assert_eq!(Format::from_path(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("a.JSON")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("a.xml")),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_load_each_format() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new();
        let documents = [
            ("doc.toml", "name = \"sample\"\n[flags]\na = true\nb = false\n"),
            ("doc.json", r#"{"name": "sample", "flags": {"a": true, "b": false}}"#),
            ("doc.yml", "name: sample\nflags:\n  a: true\n  b: false\n"),
        ];
        for (name, content) in documents {
            let path = temp.path().join(name);
            std::fs::write(&path, content).unwrap();
            let loaded: Doc = store.load(&path).unwrap();
            assert_eq!(loaded, sample(), "{name}");
        }
    }

    #[test]
    fn test_parse_error_names_format_and_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "name = ").unwrap();
        let err = ConfigStore::new().load::<Doc>(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("TOML"));
        assert!(msg.contains("bad.toml"));
    }
}
