//! In-memory registry backend
//!
//! Key and value names are case-insensitive and case-preserving. The whole
//! tree can be persisted to a JSON snapshot, which the CLI uses as a
//! sandbox on hosts without a native registry.

use crate::hive::Hive;
use crate::io;
use crate::path::split_segments;
use crate::store::RegistryBackend;
use crate::value::RegValue;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedValue {
    name: String,
    value: RegValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct KeyNode {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    values: BTreeMap<String, NamedValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    subkeys: BTreeMap<String, KeyNode>,
}

impl KeyNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn find(&self, path: &str) -> Option<&KeyNode> {
        split_segments(path).try_fold(self, |node, segment| {
            node.subkeys.get(&segment.to_lowercase())
        })
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut KeyNode> {
        split_segments(path).try_fold(self, |node, segment| {
            node.subkeys.get_mut(&segment.to_lowercase())
        })
    }

    fn create(&mut self, path: &str) -> &mut KeyNode {
        split_segments(path).fold(self, |node, segment| {
            node.subkeys
                .entry(segment.to_lowercase())
                .or_insert_with(|| KeyNode::named(segment))
        })
    }
}

/// JSON snapshot of a [`MemoryBackend`], keyed by canonical hive name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    hives: BTreeMap<String, KeyNode>,
}

/// A registry held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    hives: RwLock<BTreeMap<Hive, KeyNode>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value (builder pattern).
    pub fn with_value(mut self, hive: Hive, path: &str, name: &str, value: RegValue) -> Self {
        let hives = self.hives.get_mut().unwrap_or_else(PoisonError::into_inner);
        insert_value(hives, hive, path, name, value);
        self
    }

    /// Seed an empty key (builder pattern).
    pub fn with_subkey(mut self, hive: Hive, path: &str) -> Self {
        let hives = self.hives.get_mut().unwrap_or_else(PoisonError::into_inner);
        hives.entry(hive).or_default().create(path);
        self
    }

    /// Load a snapshot file. A missing file yields an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = io::read_text(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            format: "JSON".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Persist the registry to a snapshot file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.snapshot()).map_err(|e| Error::ConfigSerialize {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            })?;
        io::write_atomic(path, content.as_bytes())
    }

    pub fn snapshot(&self) -> Snapshot {
        let hives = self.hives.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            hives: hives
                .iter()
                .map(|(hive, node)| (hive.canonical_name().to_string(), node.clone()))
                .collect(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let hives = snapshot
            .hives
            .into_iter()
            .filter_map(|(name, node)| match name.parse::<Hive>() {
                Ok(hive) => Some((hive, node)),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring hive in snapshot");
                    None
                }
            })
            .collect();
        Self {
            hives: RwLock::new(hives),
        }
    }
}

fn insert_value(
    hives: &mut BTreeMap<Hive, KeyNode>,
    hive: Hive,
    path: &str,
    name: &str,
    value: RegValue,
) {
    let node = hives.entry(hive).or_default().create(path);
    node.values.insert(
        name.to_lowercase(),
        NamedValue {
            name: name.to_string(),
            value,
        },
    );
}

impl RegistryBackend for MemoryBackend {
    fn subkey_names(&self, hive: Hive, path: &str) -> Result<Vec<String>> {
        let hives = self.hives.read().unwrap_or_else(PoisonError::into_inner);
        Ok(hives
            .get(&hive)
            .and_then(|root| root.find(path))
            .map(|node| node.subkeys.values().map(|k| k.name.clone()).collect())
            .unwrap_or_default())
    }

    fn get_value(&self, hive: Hive, path: &str, name: &str) -> Result<Option<RegValue>> {
        let hives = self.hives.read().unwrap_or_else(PoisonError::into_inner);
        Ok(hives
            .get(&hive)
            .and_then(|root| root.find(path))
            .and_then(|node| node.values.get(&name.to_lowercase()))
            .map(|named| named.value.clone()))
    }

    fn set_value(&self, hive: Hive, path: &str, name: &str, value: &RegValue) -> Result<()> {
        let mut hives = self.hives.write().unwrap_or_else(PoisonError::into_inner);
        insert_value(&mut hives, hive, path, name, value.clone());
        Ok(())
    }

    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> Result<()> {
        let mut hives = self.hives.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(node) = hives.get_mut(&hive).and_then(|root| root.find_mut(path)) {
            node.values.remove(&name.to_lowercase());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_names_are_case_insensitive() {
        let backend = MemoryBackend::new().with_value(
            Hive::LocalMachine,
            r"SOFTWARE\Policies",
            "NoAutoUpdate",
            RegValue::Dword(1),
        );
        let value = backend
            .get_value(Hive::LocalMachine, r"software\POLICIES", "noautoupdate")
            .unwrap();
        assert_eq!(value, Some(RegValue::Dword(1)));
    }

    #[test]
    fn test_subkey_names_preserve_case() {
        let backend = MemoryBackend::new()
            .with_subkey(Hive::Users, "S-1-5-21-9")
            .with_subkey(Hive::Users, ".DEFAULT");
        let names = backend.subkey_names(Hive::Users, "").unwrap();
        assert_eq!(names, vec![".DEFAULT".to_string(), "S-1-5-21-9".to_string()]);
    }

    #[test]
    fn test_missing_is_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_value(Hive::ClassesRoot, "x", "y").unwrap(), None);
        assert!(backend.subkey_names(Hive::Users, "nope").unwrap().is_empty());
    }

    #[test]
    fn test_set_overwrites_and_delete_removes() {
        let backend = MemoryBackend::new();
        backend
            .set_value(Hive::CurrentConfig, "System", "Mode", &RegValue::String("a".into()))
            .unwrap();
        backend
            .set_value(Hive::CurrentConfig, "System", "MODE", &RegValue::String("b".into()))
            .unwrap();
        assert_eq!(
            backend.get_value(Hive::CurrentConfig, "System", "mode").unwrap(),
            Some(RegValue::String("b".into()))
        );

        backend.delete_value(Hive::CurrentConfig, "System", "Mode").unwrap();
        assert_eq!(backend.get_value(Hive::CurrentConfig, "System", "Mode").unwrap(), None);
        backend.delete_value(Hive::CurrentConfig, "System", "Mode").unwrap();
    }

    #[test]
    fn test_snapshot_persists_to_disk() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("sandbox.json");

        let backend = MemoryBackend::new().with_value(
            Hive::CurrentUser,
            r"Control Panel\Desktop",
            "MenuShowDelay",
            RegValue::String("0".into()),
        );
        backend.save(&file).unwrap();

        let loaded = MemoryBackend::load(&file).unwrap();
        assert_eq!(
            loaded
                .get_value(Hive::CurrentUser, r"Control Panel\Desktop", "MenuShowDelay")
                .unwrap(),
            Some(RegValue::String("0".into()))
        );
    }

    #[test]
    fn test_snapshot_skips_unknown_hives() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("sandbox.json");
        std::fs::write(
            &file,
            r#"{"hives": {"HKLM": {"values": {}, "subkeys": {}}, "HKEY_NOWHERE": {}}}"#,
        )
        .unwrap();

        let backend = MemoryBackend::load(&file).unwrap();
        let hives: Vec<_> = backend.snapshot().hives.into_keys().collect();
        assert_eq!(hives, vec!["HKEY_LOCAL_MACHINE".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let backend = MemoryBackend::load(&temp.path().join("absent.json")).unwrap();
        assert!(backend.snapshot().hives.is_empty());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("broken.json");
        std::fs::write(&file, "{ not json").unwrap();
        assert!(matches!(
            MemoryBackend::load(&file),
            Err(Error::ConfigParse { .. })
        ));
    }
}
