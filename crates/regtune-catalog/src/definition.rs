//! Definition document schema
//!
//! A definition file groups items by category. The item class is not part
//! of the document: the caller tags each file as normal, legacy or script
//! when loading it.
//!
//! # Example TOML
//!
//! ```toml
//! [[configuration]]
//! category = "Explorer"
//!
//! [[configuration.item]]
//! name = "Show file extensions"
//! tags = "extension filename"
//!
//! [[configuration.item.check]]
//! key = 'HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced'
//! value = "HideFileExt"
//! data = "0"
//!
//! [[configuration.item.optimize]]
//! key = 'HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced'
//! value = "HideFileExt"
//! type = "REG_DWORD"
//! data = "0"
//!
//! [[configuration.item.restore]]
//! action = "delete"
//! key = 'HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced'
//! value = "HideFileExt"
//! ```

use serde::{Deserialize, Serialize};

/// Category assigned to groups that do not name one
pub const DEFAULT_CATEGORY: &str = "General";

/// Title assigned to items that do not name one
pub const DEFAULT_TITLE: &str = "Untitled";

/// Root of a definition file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DefinitionDocument {
    #[serde(default)]
    pub configuration: Vec<ConfigurationGroup>,
}

/// Items sharing a category
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigurationGroup {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub item: Vec<ItemDefinition>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// One item as written in a definition file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub check: Vec<CheckDefinition>,
    #[serde(default)]
    pub optimize: Vec<CommandDefinition>,
    #[serde(default)]
    pub restore: Vec<CommandDefinition>,
}

/// Expected key/value pair used to detect whether an item is applied
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckDefinition {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub data: String,
}

/// What a command step does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Write,
    Delete,
    Shell,
}

/// One apply or restore step
///
/// For `shell` steps, `data` holds the command line and `type` names the
/// interpreter (default `cmd`). For `write` steps, `type` is the value
/// kind (default `REG_DWORD`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandDefinition {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let toml_str = r#"
[[configuration]]

[[configuration.item]]

[[configuration.item.optimize]]
key = 'HKLM\Software\Test'
value = "Flag"
data = "1"
"#;
        let doc: DefinitionDocument = toml::from_str(toml_str).unwrap();
        let group = &doc.configuration[0];
        assert_eq!(group.category, "General");

        let item = &group.item[0];
        assert!(item.name.is_none());
        assert!(item.check.is_empty());
        assert!(item.restore.is_empty());

        let cmd = &item.optimize[0];
        assert_eq!(cmd.action, Action::Write);
        assert!(cmd.value_type.is_none());
    }

    #[test]
    fn test_empty_document() {
        let doc: DefinitionDocument = toml::from_str("").unwrap();
        assert!(doc.configuration.is_empty());
    }

    #[test]
    fn test_action_names() {
        let cmd: CommandDefinition =
            serde_json::from_str(r#"{"action": "shell", "data": "sc stop SysMain"}"#).unwrap();
        assert_eq!(cmd.action, Action::Shell);
        assert_eq!(cmd.data, "sc stop SysMain");

        let err = serde_json::from_str::<CommandDefinition>(r#"{"action": "rename"}"#);
        assert!(err.is_err());
    }
}
