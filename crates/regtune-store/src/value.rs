//! Typed values and the literal-data coercion used by write commands
//!
//! Definitions carry every value as a literal string plus a kind tag.
//! Numeric kinds parse as base-10 integers; malformed input becomes zero so
//! the written value is always well-typed, even if semantically wrong.

use serde::{Deserialize, Serialize};

/// The kind tag attached to a write command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    String,
    ExpandString,
    MultiString,
    Dword,
    Qword,
    Binary,
}

impl ValueKind {
    /// Parse a kind tag such as `REG_DWORD` or `dword`.
    ///
    /// Unknown tags fall back to a plain string.
    pub fn parse(tag: &str) -> Self {
        let upper = tag.trim().to_uppercase();
        let bare = upper.strip_prefix("REG_").unwrap_or(&upper);
        match bare {
            "DWORD" => Self::Dword,
            "QWORD" => Self::Qword,
            "BINARY" => Self::Binary,
            "EXPAND_SZ" => Self::ExpandString,
            "MULTI_SZ" => Self::MultiString,
            _ => Self::String,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "REG_SZ",
            Self::ExpandString => "REG_EXPAND_SZ",
            Self::MultiString => "REG_MULTI_SZ",
            Self::Dword => "REG_DWORD",
            Self::Qword => "REG_QWORD",
            Self::Binary => "REG_BINARY",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A value as stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RegValue {
    String(String),
    ExpandString(String),
    MultiString(Vec<String>),
    Dword(u32),
    Qword(u64),
    Binary(Vec<u8>),
}

impl RegValue {
    /// Build a typed value from a literal data string.
    ///
    /// DWORD and QWORD parse as signed base-10 and keep the two's-complement
    /// bits; unparsable input coerces to zero. BINARY always yields an empty
    /// payload. Every other kind stores the trimmed literal.
    pub fn coerce(kind: ValueKind, data: &str) -> Self {
        let data = data.trim();
        match kind {
            ValueKind::Dword => Self::Dword(data.parse::<i32>().unwrap_or(0) as u32),
            ValueKind::Qword => Self::Qword(data.parse::<i64>().unwrap_or(0) as u64),
            ValueKind::Binary => Self::Binary(Vec::new()),
            ValueKind::ExpandString => Self::ExpandString(data.to_string()),
            ValueKind::MultiString => Self::MultiString(vec![data.to_string()]),
            ValueKind::String => Self::String(data.to_string()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::ExpandString(_) => ValueKind::ExpandString,
            Self::MultiString(_) => ValueKind::MultiString,
            Self::Dword(_) => ValueKind::Dword,
            Self::Qword(_) => ValueKind::Qword,
            Self::Binary(_) => ValueKind::Binary,
        }
    }
}

impl std::fmt::Display for RegValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) | Self::ExpandString(s) => f.write_str(s),
            Self::MultiString(lines) => f.write_str(&lines.join("\n")),
            Self::Dword(v) => write!(f, "{}", *v as i32),
            Self::Qword(v) => write!(f, "{}", *v as i64),
            Self::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// Compare live text against expected data: both trimmed, case ignored.
pub fn text_matches(actual: &str, expected: &str) -> bool {
    actual.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Compare a possibly absent live value against expected data.
///
/// An absent value never matches.
pub fn value_matches(actual: Option<&RegValue>, expected: &str) -> bool {
    actual.is_some_and(|value| text_matches(&value.to_string(), expected))
}
