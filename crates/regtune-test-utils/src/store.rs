//! Scriptable in-memory store recording every call

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use regtune_store::{Error, Hive, KeyValueStore, RegValue, Result, RootHandle};

use crate::journal::{Event, Journal};

/// One recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Read { path: String, name: String },
    Write { path: String, name: String, value: RegValue },
    Delete { path: String, name: String },
}

impl StoreOp {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Read { .. })
    }
}

type ValueKey = (String, String);

/// Flat, case-insensitive store keyed by `HIVE\sub\path` and value name.
///
/// Paths listed with [`FakeStore::fail_on`] reject every call with an
/// access error.
#[derive(Debug, Default)]
pub struct FakeStore {
    values: Mutex<HashMap<ValueKey, RegValue>>,
    failing: Mutex<BTreeSet<String>>,
    ops: Mutex<Vec<StoreOp>>,
    journal: Option<Journal>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn full_path(root: &RootHandle, sub_path: &str) -> String {
    root.display_path(sub_path)
}

fn key(path: &str, name: &str) -> ValueKey {
    (path.to_lowercase(), name.to_lowercase())
}

/// Canonicalize `ROOT\sub` so scripted paths use the same form as lookups.
fn canonical(raw_path: &str) -> String {
    let path = regtune_store::KeyPath::parse(raw_path);
    match Hive::from_alias(path.root()) {
        Some(hive) => RootHandle::new(hive).display_path(path.sub_path()),
        None => raw_path.to_string(),
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value at a root-qualified path such as `HKLM\SOFTWARE\X`.
    pub fn with_value(self, raw_path: &str, name: &str, value: RegValue) -> Self {
        guard(&self.values).insert(key(&canonical(raw_path), name), value);
        self
    }

    /// Make every call under `raw_path` fail.
    pub fn fail_on(self, raw_path: &str) -> Self {
        guard(&self.failing).insert(canonical(raw_path).to_lowercase());
        self
    }

    /// Also append every call to `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn value(&self, raw_path: &str, name: &str) -> Option<RegValue> {
        guard(&self.values)
            .get(&key(&canonical(raw_path), name))
            .cloned()
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        guard(&self.ops).clone()
    }

    pub fn mutations(&self) -> Vec<StoreOp> {
        self.ops().into_iter().filter(StoreOp::is_mutation).collect()
    }

    pub fn clear_ops(&self) {
        guard(&self.ops).clear();
    }

    fn record(&self, op: StoreOp) {
        if let Some(journal) = &self.journal {
            journal.record(Event::Store(op.clone()));
        }
        guard(&self.ops).push(op);
    }

    fn check_failing(&self, path: &str) -> Result<()> {
        if guard(&self.failing).contains(&path.to_lowercase()) {
            return Err(Error::AccessDenied {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FakeStore {
    fn open_root(&self, root_name: &str) -> Option<RootHandle> {
        Hive::from_alias(root_name).map(RootHandle::new)
    }

    fn read(
        &self,
        root: &RootHandle,
        sub_path: &str,
        value_name: &str,
    ) -> Result<Option<RegValue>> {
        let path = full_path(root, sub_path);
        self.record(StoreOp::Read {
            path: path.clone(),
            name: value_name.to_string(),
        });
        self.check_failing(&path)?;
        Ok(guard(&self.values).get(&key(&path, value_name)).cloned())
    }

    fn write(
        &self,
        root: &RootHandle,
        sub_path: &str,
        value_name: &str,
        value: &RegValue,
    ) -> Result<()> {
        let path = full_path(root, sub_path);
        self.record(StoreOp::Write {
            path: path.clone(),
            name: value_name.to_string(),
            value: value.clone(),
        });
        self.check_failing(&path)?;
        guard(&self.values).insert(key(&path, value_name), value.clone());
        Ok(())
    }

    fn delete(&self, root: &RootHandle, sub_path: &str, value_name: &str) -> Result<()> {
        let path = full_path(root, sub_path);
        self.record(StoreOp::Delete {
            path: path.clone(),
            name: value_name.to_string(),
        });
        self.check_failing(&path)?;
        guard(&self.values).remove(&key(&path, value_name));
        Ok(())
    }
}
