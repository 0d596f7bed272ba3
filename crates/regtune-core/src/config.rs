//! Settings parsing for regtune.toml
//!
//! ```toml
//! [definitions]
//! normal = ["definitions/normal.toml"]
//! legacy = ["definitions/legacy.toml"]
//! script = ["definitions/script.toml"]
//!
//! [engine]
//! restart_token = "explorer"
//! restart_command = "taskkill /f /im explorer.exe"
//!
//! [user_context]
//! sid_pattern = "(?i)^S-1-5-21-"
//! excluded_suffix = "_Classes"
//!
//! [presets.surfacego2]
//! label = "Surface Go 2"
//! titles = ["Disable SysMain", "Turn off fast startup"]
//! ```
//!
//! Every section is optional. Relative definition paths resolve against
//! the directory holding the settings file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regtune_catalog::{DefinitionSource, ItemClass, PresetDefinition, PresetTable};
use regtune_store::UserContext;
use regtune_store::io;
use regtune_store::store::{DEFAULT_EXCLUDED_SUFFIX, DEFAULT_SID_PATTERN};
use serde::{Deserialize, Serialize};

use crate::engine::{DEFAULT_RESTART_COMMAND, DEFAULT_RESTART_TOKEN, EngineOptions};
use crate::{Error, Result};

/// File name looked up in the working directory and the user config dir
pub const SETTINGS_FILE: &str = "regtune.toml";

fn default_normal() -> Vec<PathBuf> {
    vec![PathBuf::from("definitions/normal.toml")]
}

fn default_legacy() -> Vec<PathBuf> {
    vec![PathBuf::from("definitions/legacy.toml")]
}

fn default_script() -> Vec<PathBuf> {
    vec![PathBuf::from("definitions/script.toml")]
}

fn default_restart_token() -> String {
    DEFAULT_RESTART_TOKEN.to_string()
}

fn default_restart_command() -> String {
    DEFAULT_RESTART_COMMAND.to_string()
}

fn default_sid_pattern() -> String {
    DEFAULT_SID_PATTERN.to_string()
}

fn default_excluded_suffix() -> String {
    DEFAULT_EXCLUDED_SUFFIX.to_string()
}

/// Definition files per item class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionPaths {
    #[serde(default = "default_normal")]
    pub normal: Vec<PathBuf>,
    #[serde(default = "default_legacy")]
    pub legacy: Vec<PathBuf>,
    #[serde(default = "default_script")]
    pub script: Vec<PathBuf>,
}

impl Default for DefinitionPaths {
    fn default() -> Self {
        Self {
            normal: default_normal(),
            legacy: default_legacy(),
            script: default_script(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_restart_token")]
    pub restart_token: String,
    #[serde(default = "default_restart_command")]
    pub restart_command: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            restart_token: default_restart_token(),
            restart_command: default_restart_command(),
        }
    }
}

/// How the logged-in user's namespace is found under the users root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContextSettings {
    #[serde(default = "default_sid_pattern")]
    pub sid_pattern: String,
    #[serde(default = "default_excluded_suffix")]
    pub excluded_suffix: String,
}

impl Default for UserContextSettings {
    fn default() -> Self {
        Self {
            sid_pattern: default_sid_pattern(),
            excluded_suffix: default_excluded_suffix(),
        }
    }
}

/// Parsed regtune.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub definitions: DefinitionPaths,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub user_context: UserContextSettings,

    /// Extra presets, added on top of the built-ins
    #[serde(default)]
    pub presets: BTreeMap<String, PresetDefinition>,

    /// File these settings came from, if any
    #[serde(skip)]
    origin: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from TOML content
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        let mut settings = Self::parse(&content).map_err(|message| Error::SettingsParse {
            path: path.to_path_buf(),
            message,
        })?;
        settings.origin = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Find and load settings.
    ///
    /// An explicit path must exist. Otherwise `./regtune.toml` is tried,
    /// then `regtune/regtune.toml` under the user config directory, and
    /// finally the defaults are used.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            return Self::load(path);
        }

        let mut candidates = vec![PathBuf::from(SETTINGS_FILE)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("regtune").join(SETTINGS_FILE));
        }

        for candidate in candidates {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Using settings file");
                return Self::load(&candidate);
            }
        }

        tracing::debug!("No settings file found, using defaults");
        Ok(Self::default())
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Directory relative definition paths resolve against
    pub fn base_dir(&self) -> PathBuf {
        self.origin
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Definition files tagged with their class, in load order.
    pub fn definition_sources(&self) -> Vec<DefinitionSource> {
        let base = self.base_dir();
        let groups = [
            (ItemClass::Normal, &self.definitions.normal),
            (ItemClass::Legacy, &self.definitions.legacy),
            (ItemClass::Script, &self.definitions.script),
        ];

        groups
            .into_iter()
            .flat_map(|(class, paths)| {
                paths
                    .iter()
                    .map(|path| DefinitionSource::new(base.join(path), class))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            restart_token: self.engine.restart_token.clone(),
            restart_command: self.engine.restart_command.clone(),
        }
    }

    /// Compile the SID pattern.
    pub fn user_context(&self) -> Result<UserContext> {
        Ok(UserContext::new(
            &self.user_context.sid_pattern,
            self.user_context.excluded_suffix.clone(),
        )?)
    }

    /// Built-in presets plus the configured ones.
    pub fn preset_table(&self) -> PresetTable {
        let mut table = PresetTable::with_builtins();
        table.extend_from_definitions(self.presets.clone());
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.definitions, DefinitionPaths::default());
        assert_eq!(settings.engine.restart_token, "explorer");
        assert_eq!(settings.user_context.excluded_suffix, "_Classes");
        assert!(settings.presets.is_empty());
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::parse(
            r#"
[definitions]
normal = ["a.toml", "b.json"]

[engine]
restart_token = "Shell"
"#,
        )
        .unwrap();
        assert_eq!(settings.definitions.normal.len(), 2);
        assert_eq!(settings.definitions.legacy, default_legacy());
        assert_eq!(settings.engine.restart_token, "Shell");
        assert_eq!(settings.engine.restart_command, DEFAULT_RESTART_COMMAND);
    }

    #[test]
    fn test_definition_sources_resolve_against_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            "[definitions]\nnormal = [\"n.toml\"]\nlegacy = []\nscript = [\"s.yaml\"]\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        let sources = settings.definition_sources();
        assert_eq!(
            sources,
            vec![
                DefinitionSource::new(dir.path().join("n.toml"), ItemClass::Normal),
                DefinitionSource::new(dir.path().join("s.yaml"), ItemClass::Script),
            ]
        );
    }

    #[test]
    fn test_invalid_settings_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "[engine\n").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(Error::SettingsParse { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::discover(Some(&missing)),
            Err(Error::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_sid_pattern() {
        let settings = Settings::parse("[user_context]\nsid_pattern = \"(\"\n").unwrap();
        assert!(settings.user_context().is_err());
    }

    #[test]
    fn test_preset_table_includes_configured() {
        let settings = Settings::parse(
            r#"
[presets.office]
label = "Office"
titles = ["X"]
"#,
        )
        .unwrap();
        let table = settings.preset_table();
        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, vec!["AllNotSelect", "AllSelect", "office"]);
    }
}
