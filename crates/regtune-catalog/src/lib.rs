//! Declarative optimization items for regtune
//!
//! This crate holds the item model (check rules, apply and restore
//! commands), the loader that turns definition documents into items, the
//! in-memory [`Catalog`], keyword search, selection profiles and presets.
//! Nothing here touches the key/value store; probing and applying live in
//! `regtune-core`.

pub mod catalog;
pub mod definition;
pub mod error;
pub mod loader;
pub mod model;
pub mod preset;
pub mod profile;
pub mod search;

pub use catalog::Catalog;
pub use definition::{
    Action, CheckDefinition, CommandDefinition, ConfigurationGroup, DefinitionDocument,
    ItemDefinition,
};
pub use error::{Error, Result};
pub use loader::{DefinitionLoader, DefinitionSource};
pub use model::{CheckRule, Command, CommandKind, Item, ItemClass};
pub use preset::{Preset, PresetDefinition, PresetRule, PresetRuleKind, PresetTable};
pub use profile::{Profile, export_profile, import_profile};
pub use search::SearchIndex;
