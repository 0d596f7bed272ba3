//! Loader turning definition documents into catalog items
//!
//! Each file is tagged with an [`ItemClass`] by the caller. A typical
//! installation ships three files:
//!
//! ```text
//! definitions/
//!   normal.toml
//!   legacy.toml
//!   script.toml
//! ```

use crate::catalog::Catalog;
use crate::definition::{
    Action, CheckDefinition, CommandDefinition, DEFAULT_TITLE, DefinitionDocument, ItemDefinition,
};
use crate::model::{CheckRule, Command, Item, ItemClass};
use crate::{Error, Result};
use regtune_store::{ConfigStore, Error as StoreError, Format, ValueKind};
use std::path::{Path, PathBuf};

/// Placeholder some descriptions carry for generated detail text
const AUTO_DETAILS_PLACEHOLDER: &str = "{AutoDetails}";

/// Interpreter tag used for shell steps that do not name one
const DEFAULT_INTERPRETER: &str = "cmd";

/// A definition file and the class its items belong to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSource {
    pub path: PathBuf,
    pub class: ItemClass,
}

impl DefinitionSource {
    pub fn new(path: impl Into<PathBuf>, class: ItemClass) -> Self {
        Self {
            path: path.into(),
            class,
        }
    }
}

/// Loads items from definition files
#[derive(Debug, Default)]
pub struct DefinitionLoader;

impl DefinitionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw definition text, returning the parser message on failure.
    pub fn parse(
        &self,
        content: &str,
        format: Format,
    ) -> std::result::Result<DefinitionDocument, String> {
        format.parse(content)
    }

    /// Build items from an in-memory document.
    ///
    /// `source_name` only appears in error messages.
    pub fn load_bytes(
        &self,
        bytes: &[u8],
        format: Format,
        class: ItemClass,
        source_name: &str,
    ) -> Result<Vec<Item>> {
        let parse_error = |message: String| Error::DefinitionParse {
            source_name: source_name.to_string(),
            format: format.name().to_string(),
            message,
        };

        let content = std::str::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;
        let document = self.parse(content, format).map_err(parse_error)?;
        Ok(collect_items(document, class, source_name))
    }

    /// Load one definition file; the format follows its extension.
    pub fn load_file(&self, path: &Path, class: ItemClass) -> Result<Vec<Item>> {
        let source_name = path.display().to_string();
        let document = ConfigStore::new()
            .load::<DefinitionDocument>(path)
            .map_err(|err| match err {
                StoreError::ConfigParse { format, message, .. } => Error::DefinitionParse {
                    source_name: source_name.clone(),
                    format,
                    message,
                },
                other => Error::Store(other),
            })?;
        Ok(collect_items(document, class, &source_name))
    }

    /// Load every source into one catalog, in order.
    ///
    /// A file that cannot be read or parsed is logged and skipped.
    pub fn load_all(&self, sources: &[DefinitionSource]) -> Catalog {
        let mut catalog = Catalog::new();

        for source in sources {
            match self.load_file(&source.path, source.class) {
                Ok(items) => catalog.extend(items),
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", source.path, e);
                }
            }
        }

        catalog
    }
}

fn collect_items(document: DefinitionDocument, class: ItemClass, source_name: &str) -> Vec<Item> {
    let items = build_items(document, class);
    tracing::debug!(
        source = source_name,
        class = %class,
        count = items.len(),
        "Loaded definitions"
    );
    items
}

fn build_items(document: DefinitionDocument, class: ItemClass) -> Vec<Item> {
    let mut items = Vec::new();
    for group in document.configuration {
        for def in group.item {
            items.push(build_item(def, class, &group.category));
        }
    }
    items
}

fn build_item(def: ItemDefinition, class: ItemClass, category: &str) -> Item {
    let title = def
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let mut item = Item::new(title, class, category)
        .with_description(normalize_description(&def.description))
        .with_tags(def.tags);

    for check in def.check {
        item = item.with_check(build_check(check));
    }
    for cmd in def.optimize {
        item = item.with_apply(build_command(cmd));
    }
    for cmd in def.restore {
        item = item.with_restore(build_command(cmd));
    }
    item
}

fn build_check(def: CheckDefinition) -> CheckRule {
    CheckRule::new(def.key, def.value, def.data)
}

fn build_command(def: CommandDefinition) -> Command {
    match def.action {
        Action::Write => {
            let kind = def
                .value_type
                .unwrap_or_else(|| ValueKind::Dword.tag().to_string());
            Command::write(def.key, def.value, kind, def.data)
        }
        Action::Delete => Command::delete(def.key, def.value),
        Action::Shell => {
            let interpreter = def
                .value_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());
            Command::shell_with(interpreter, def.data.trim())
        }
    }
}

/// Unify line endings, strip indentation and drop the detail placeholder.
pub fn normalize_description(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    unified
        .split('\n')
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n")
        .replace(AUTO_DETAILS_PLACEHOLDER, "")
        .trim()
        .to_string()
}
