//! Item model: check rules, commands and optimization items

use crate::search::SearchIndex;
use crate::{Error, Result};
use regtune_store::{KeyPath, RegValue, ValueKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which load an item came from; decides whether it may ever be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemClass {
    /// Regular optimization, applied and restored by the engine.
    #[default]
    Normal,
    /// Outdated tweak kept for reference. Checked, never applied.
    Legacy,
    /// Script for the user to run by hand. Checked, never applied.
    Script,
}

impl ItemClass {
    pub const ALL: [ItemClass; 3] = [ItemClass::Normal, ItemClass::Legacy, ItemClass::Script];

    /// Display-only classes are excluded from every write path.
    pub fn is_display_only(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Legacy => "legacy",
            Self::Script => "script",
        }
    }
}

impl FromStr for ItemClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "legacy" => Ok(Self::Legacy),
            "script" => Ok(Self::Script),
            other => Err(Error::UnknownClass(other.to_string())),
        }
    }
}

impl std::fmt::Display for ItemClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One live-system assertion: `value_name` under `raw_path` must equal
/// `expected_data` for the owning item to count as applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRule {
    raw_path: String,
    value_name: String,
    expected_data: String,
}

impl CheckRule {
    pub fn new(
        raw_path: impl Into<String>,
        value_name: impl Into<String>,
        expected_data: impl Into<String>,
    ) -> Self {
        Self {
            raw_path: raw_path.into(),
            value_name: value_name.into(),
            expected_data: expected_data.into(),
        }
    }

    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    pub fn expected_data(&self) -> &str {
        &self.expected_data
    }

    pub fn key_path(&self) -> KeyPath {
        KeyPath::parse(&self.raw_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Write,
    Delete,
    Shell,
}

/// A single step of an apply or restore list.
///
/// For `Shell` commands only `data` is meaningful: it holds the command
/// line. `value_kind` then names the interpreter tag from the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    raw_path: String,
    value_name: String,
    value_kind: String,
    data: String,
}

impl Command {
    pub fn write(
        raw_path: impl Into<String>,
        value_name: impl Into<String>,
        value_kind: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            kind: CommandKind::Write,
            raw_path: raw_path.into(),
            value_name: value_name.into(),
            value_kind: value_kind.into(),
            data: data.into(),
        }
    }

    pub fn delete(raw_path: impl Into<String>, value_name: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Delete,
            raw_path: raw_path.into(),
            value_name: value_name.into(),
            value_kind: ValueKind::String.tag().to_string(),
            data: String::new(),
        }
    }

    pub fn shell(line: impl Into<String>) -> Self {
        Self::shell_with("cmd", line)
    }

    pub fn shell_with(interpreter: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Shell,
            raw_path: String::new(),
            value_name: String::new(),
            value_kind: interpreter.into(),
            data: line.into(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    pub fn value_kind(&self) -> &str {
        &self.value_kind
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_shell(&self) -> bool {
        self.kind == CommandKind::Shell
    }

    pub fn key_path(&self) -> KeyPath {
        KeyPath::parse(&self.raw_path)
    }

    /// The value a `Write` command stores, coerced from its literal data.
    pub fn typed_value(&self) -> RegValue {
        RegValue::coerce(ValueKind::parse(&self.value_kind), &self.data)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CommandKind::Write => write!(
                f,
                "write {}\\{} = {} ({})",
                self.raw_path, self.value_name, self.data, self.value_kind
            ),
            CommandKind::Delete => write!(f, "delete {}\\{}", self.raw_path, self.value_name),
            CommandKind::Shell => write!(f, "shell `{}`", self.data),
        }
    }
}

/// One user-toggleable optimization.
///
/// Check, apply and restore lists execute in insertion order. `selected`
/// only changes through an explicit toggle, preset, import or refresh.
#[derive(Debug, Clone)]
pub struct Item {
    id: String,
    title: String,
    class: ItemClass,
    category: String,
    description: String,
    tags: String,
    checks: Vec<CheckRule>,
    apply_commands: Vec<Command>,
    restore_commands: Vec<Command>,
    selected: bool,
    locked: bool,
    search_index: SearchIndex,
}

impl Item {
    /// Create an item. Display-only classes start locked.
    pub fn new(title: impl Into<String>, class: ItemClass, category: impl Into<String>) -> Self {
        let mut item = Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            class,
            category: category.into(),
            description: String::new(),
            tags: String::new(),
            checks: Vec::new(),
            apply_commands: Vec::new(),
            restore_commands: Vec::new(),
            selected: false,
            locked: class.is_display_only(),
            search_index: SearchIndex::default(),
        };
        item.rebuild_search_index();
        item
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.rebuild_search_index();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self.rebuild_search_index();
        self
    }

    pub fn with_check(mut self, check: CheckRule) -> Self {
        self.checks.push(check);
        self
    }

    pub fn with_apply(mut self, command: Command) -> Self {
        self.apply_commands.push(command);
        self.rebuild_search_index();
        self
    }

    pub fn with_restore(mut self, command: Command) -> Self {
        self.restore_commands.push(command);
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn class(&self) -> ItemClass {
        self.class
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &str {
        &self.tags
    }

    pub fn checks(&self) -> &[CheckRule] {
        &self.checks
    }

    pub fn apply_commands(&self) -> &[Command] {
        &self.apply_commands
    }

    pub fn restore_commands(&self) -> &[Command] {
        &self.restore_commands
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True if the engine may ever write on behalf of this item.
    pub fn is_applicable(&self) -> bool {
        !self.class.is_display_only() && !self.locked
    }

    /// Commands to run for the current selection state.
    pub fn pending_commands(&self) -> &[Command] {
        if self.selected {
            &self.apply_commands
        } else {
            &self.restore_commands
        }
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search_index
    }

    /// Case-insensitive AND keyword match against the search index.
    pub fn matches(&self, query: &str) -> bool {
        self.search_index.matches(query)
    }

    pub fn rebuild_search_index(&mut self) {
        self.search_index = SearchIndex::build(
            &self.title,
            &self.description,
            &self.category,
            &self.tags,
            &self.apply_commands,
        );
    }
}
