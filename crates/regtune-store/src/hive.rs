//! Root namespaces ("hives") and their accepted aliases

use crate::path::SEPARATOR;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A top-level container of the key/value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hive {
    ClassesRoot,
    CurrentUser,
    LocalMachine,
    Users,
    CurrentConfig,
}

impl Hive {
    pub const ALL: [Hive; 5] = [
        Hive::ClassesRoot,
        Hive::CurrentUser,
        Hive::LocalMachine,
        Hive::Users,
        Hive::CurrentConfig,
    ];

    /// Normalize a root name: trim, strip leading separators, uppercase.
    pub fn normalize_name(name: &str) -> String {
        name.trim().trim_start_matches(SEPARATOR).to_uppercase()
    }

    /// Look up a hive by one of its recognized spellings.
    ///
    /// Returns `None` for anything outside the fixed alias set.
    pub fn from_alias(name: &str) -> Option<Self> {
        match Self::normalize_name(name).as_str() {
            "HKCR" | "HKEY_CLASSES_ROOT" => Some(Self::ClassesRoot),
            "HKCU" | "HKEY_CURRENT_USER" => Some(Self::CurrentUser),
            "HKLM" | "HKEY_LOCAL_MACHINE" => Some(Self::LocalMachine),
            "HKU" | "HKEY_USERS" => Some(Self::Users),
            "HKCC" | "HKEY_CURRENT_CONFIG" => Some(Self::CurrentConfig),
            _ => None,
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::ClassesRoot => "HKEY_CLASSES_ROOT",
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
            Self::Users => "HKEY_USERS",
            Self::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::ClassesRoot => "HKCR",
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
            Self::Users => "HKU",
            Self::CurrentConfig => "HKCC",
        }
    }
}

impl FromStr for Hive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_alias(s).ok_or_else(|| Error::UnknownRoot {
            root: s.to_string(),
        })
    }
}

impl std::fmt::Display for Hive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}
