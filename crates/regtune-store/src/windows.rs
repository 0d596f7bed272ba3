//! Native registry backend (Windows only)

use crate::hive::Hive;
use crate::path::join;
use crate::store::RegistryBackend;
use crate::value::RegValue;
use crate::{Error, Result};
use std::io::ErrorKind;
use winreg::enums::{
    HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS,
    KEY_ALL_ACCESS, KEY_READ, KEY_SET_VALUE, KEY_WOW64_64KEY, RegType,
};
use winreg::types::FromRegValue;
use winreg::{RegKey, RegValue as RawValue};

/// Backend over the live registry, always using the 64-bit view.
#[derive(Debug, Default)]
pub struct WindowsBackend;

impl WindowsBackend {
    pub fn new() -> Self {
        Self
    }

    fn predef(hive: Hive) -> RegKey {
        RegKey::predef(match hive {
            Hive::ClassesRoot => HKEY_CLASSES_ROOT,
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            Hive::Users => HKEY_USERS,
            Hive::CurrentConfig => HKEY_CURRENT_CONFIG,
        })
    }

    /// Open an existing key; a missing key is `Ok(None)`.
    fn open(hive: Hive, path: &str, access: u32, op: &'static str) -> Result<Option<RegKey>> {
        match Self::predef(hive).open_subkey_with_flags(path, access | KEY_WOW64_64KEY) {
            Ok(key) => Ok(Some(key)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::registry(op, join(hive.canonical_name(), path), e)),
        }
    }
}

impl RegistryBackend for WindowsBackend {
    fn subkey_names(&self, hive: Hive, path: &str) -> Result<Vec<String>> {
        let Some(key) = Self::open(hive, path, KEY_READ, "enumerate")? else {
            return Ok(Vec::new());
        };
        key.enum_keys()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::registry("enumerate", join(hive.canonical_name(), path), e))
    }

    fn get_value(&self, hive: Hive, path: &str, name: &str) -> Result<Option<RegValue>> {
        let Some(key) = Self::open(hive, path, KEY_READ, "read")? else {
            return Ok(None);
        };
        match key.get_raw_value(name) {
            Ok(raw) => Ok(Some(from_raw(&raw))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::registry("read", join(hive.canonical_name(), path), e)),
        }
    }

    fn set_value(&self, hive: Hive, path: &str, name: &str, value: &RegValue) -> Result<()> {
        let full = join(hive.canonical_name(), path);
        let (key, _disposition) = Self::predef(hive)
            .create_subkey_with_flags(path, KEY_ALL_ACCESS | KEY_WOW64_64KEY)
            .map_err(|e| Error::registry("create", full.clone(), e))?;
        key.set_raw_value(name, &to_raw(value))
            .map_err(|e| Error::registry("write", full, e))
    }

    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> Result<()> {
        let Some(key) = Self::open(hive, path, KEY_SET_VALUE, "delete")? else {
            return Ok(());
        };
        match key.delete_value(name) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::registry("delete", join(hive.canonical_name(), path), e)),
        }
    }
}

fn encode_utf16(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

fn to_raw(value: &RegValue) -> RawValue {
    match value {
        RegValue::String(s) => RawValue {
            bytes: encode_utf16(s),
            vtype: RegType::REG_SZ,
        },
        RegValue::ExpandString(s) => RawValue {
            bytes: encode_utf16(s),
            vtype: RegType::REG_EXPAND_SZ,
        },
        RegValue::MultiString(lines) => {
            let mut bytes: Vec<u8> = lines.iter().flat_map(|l| encode_utf16(l)).collect();
            bytes.extend_from_slice(&[0, 0]);
            RawValue {
                bytes,
                vtype: RegType::REG_MULTI_SZ,
            }
        }
        RegValue::Dword(v) => RawValue {
            bytes: v.to_le_bytes().to_vec(),
            vtype: RegType::REG_DWORD,
        },
        RegValue::Qword(v) => RawValue {
            bytes: v.to_le_bytes().to_vec(),
            vtype: RegType::REG_QWORD,
        },
        RegValue::Binary(bytes) => RawValue {
            bytes: bytes.clone(),
            vtype: RegType::REG_BINARY,
        },
    }
}

fn from_raw(raw: &RawValue) -> RegValue {
    let decoded = match raw.vtype {
        RegType::REG_SZ => String::from_reg_value(raw).map(RegValue::String),
        RegType::REG_EXPAND_SZ => String::from_reg_value(raw).map(RegValue::ExpandString),
        RegType::REG_MULTI_SZ => Vec::<String>::from_reg_value(raw).map(|lines| {
            RegValue::MultiString(lines.into_iter().filter(|l| !l.is_empty()).collect())
        }),
        RegType::REG_DWORD if raw.bytes.len() >= 4 => Ok(RegValue::Dword(u32::from_le_bytes([
            raw.bytes[0],
            raw.bytes[1],
            raw.bytes[2],
            raw.bytes[3],
        ]))),
        RegType::REG_QWORD if raw.bytes.len() >= 8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&raw.bytes[..8]);
            Ok(RegValue::Qword(u64::from_le_bytes(buf)))
        }
        _ => Ok(RegValue::Binary(raw.bytes.clone())),
    };
    decoded.unwrap_or_else(|_| RegValue::Binary(raw.bytes.clone()))
}
