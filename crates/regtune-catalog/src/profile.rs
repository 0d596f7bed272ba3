//! Selection profiles: a flat title to selected mapping
//!
//! Profiles are matched by exact title, so a profile exported from an
//! older catalog still applies to the items both catalogs share.

use crate::catalog::Catalog;
use crate::{Error, Result};
use regtune_store::io;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Exchange document mapping item titles to their selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    entries: BTreeMap<String, bool>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>, selected: bool) {
        self.entries.insert(title.into(), selected);
    }

    pub fn get(&self, title: &str) -> Option<bool> {
        self.entries.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(title, selected)| (title.as_str(), *selected))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::ProfileFormat {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::ProfileFormat {
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        io::write_atomic(path, json.as_bytes())?;
        Ok(())
    }
}

impl FromIterator<(String, bool)> for Profile {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Snapshot every item's selection. Colliding titles keep the last item.
pub fn export_profile(catalog: &Catalog) -> Profile {
    catalog
        .iter()
        .map(|item| (item.title().to_string(), item.is_selected()))
        .collect()
}

/// Overwrite the selection of every item named in `profile`.
///
/// Unknown titles are ignored. Returns the number of entries that matched
/// an item.
pub fn import_profile(catalog: &mut Catalog, profile: &Profile) -> usize {
    let mut matched = 0;
    for (title, selected) in profile.iter() {
        match catalog.get_mut(title) {
            Some(item) => {
                item.set_selected(selected);
                matched += 1;
            }
            None => tracing::debug!(title, "Profile entry has no matching item"),
        }
    }
    matched
}
