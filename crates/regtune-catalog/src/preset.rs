//! Bulk selection presets
//!
//! A preset is a named rule over items. Applying one clears every
//! selection and then selects the items the rule accepts. The table ships
//! with two built-ins and takes more from configuration:
//!
//! ```toml
//! [presets.surfacego2]
//! label = "Surface Go 2"
//! rule = "titles"
//! titles = ["Disable SysMain", "Turn off fast startup"]
//! ```

use crate::catalog::Catalog;
use crate::model::{Item, ItemClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Built-in key selecting every normal item
pub const ALL_SELECT: &str = "AllSelect";

/// Built-in key clearing every selection
pub const ALL_NOT_SELECT: &str = "AllNotSelect";

/// Which items a preset selects after clearing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetRule {
    AllOfClass(ItemClass),
    Clear,
    Titles(BTreeSet<String>),
}

impl PresetRule {
    pub fn accepts(&self, item: &Item) -> bool {
        match self {
            Self::AllOfClass(class) => item.class() == *class,
            Self::Clear => false,
            Self::Titles(titles) => titles.contains(item.title()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub label: String,
    pub rule: PresetRule,
}

impl Preset {
    pub fn new(label: impl Into<String>, rule: PresetRule) -> Self {
        Self {
            label: label.into(),
            rule,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetRuleKind {
    AllOfClass,
    Clear,
    #[default]
    Titles,
}

/// Preset as written in the configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PresetDefinition {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub rule: PresetRuleKind,
    #[serde(default)]
    pub class: ItemClass,
    #[serde(default)]
    pub titles: Vec<String>,
}

impl PresetDefinition {
    /// Convert to a preset, labelled with `key` when no label is given.
    pub fn into_preset(self, key: &str) -> Preset {
        let rule = match self.rule {
            PresetRuleKind::AllOfClass => PresetRule::AllOfClass(self.class),
            PresetRuleKind::Clear => PresetRule::Clear,
            PresetRuleKind::Titles => PresetRule::Titles(self.titles.into_iter().collect()),
        };
        Preset::new(self.label.unwrap_or_else(|| key.to_string()), rule)
    }
}

/// Mapping from preset key to preset
#[derive(Debug, Clone, Default)]
pub struct PresetTable {
    presets: BTreeMap<String, Preset>,
}

impl PresetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding `AllSelect` and `AllNotSelect`.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.register(
            ALL_SELECT,
            Preset::new("Select all", PresetRule::AllOfClass(ItemClass::Normal)),
        );
        table.register(ALL_NOT_SELECT, Preset::new("Clear", PresetRule::Clear));
        table
    }

    /// Add or replace a preset.
    pub fn register(&mut self, key: impl Into<String>, preset: Preset) {
        self.presets.insert(key.into(), preset);
    }

    pub fn extend_from_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = (String, PresetDefinition)>,
    ) {
        for (key, def) in definitions {
            let preset = def.into_preset(&key);
            self.register(key, preset);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Preset> {
        self.presets.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.presets.iter().map(|(key, preset)| (key.as_str(), preset))
    }

    /// Clear all selections and select what the preset accepts.
    ///
    /// Returns the number of selected items, or `None` when `key` is
    /// unknown, in which case the catalog is left untouched.
    pub fn apply(&self, key: &str, catalog: &mut Catalog) -> Option<usize> {
        let Some(preset) = self.get(key) else {
            tracing::warn!(key, "Unknown preset, nothing changed");
            return None;
        };

        let mut count = 0;
        for item in catalog.iter_mut() {
            let select = preset.rule.accepts(item);
            item.set_selected(select);
            if select {
                count += 1;
            }
        }

        tracing::info!(key, label = %preset.label, selected = count, "Applied preset");
        Some(count)
    }
}
