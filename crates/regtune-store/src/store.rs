//! Store capability surface and root resolution
//!
//! [`KeyValueStore`] is what the reconciliation engine talks to. The
//! production implementation, [`RegistryStore`], resolves root aliases and
//! redirects the current-user root to the interactively logged-in user
//! before delegating raw I/O to a [`RegistryBackend`].

use crate::hive::Hive;
use crate::path::join;
use crate::value::{RegValue, value_matches};
use crate::{Error, Result};
use regex::Regex;

/// Default shape of an interactive user's SID under the users root.
pub const DEFAULT_SID_PATTERN: &str = r"(?i)^S-1-5-21-";

/// Literal prefix matched case-insensitively by the default context.
const DEFAULT_SID_PREFIX: &str = "S-1-5-21-";

/// Suffix of the per-user classes subkey that sits beside each SID.
pub const DEFAULT_EXCLUDED_SUFFIX: &str = "_Classes";

/// An opened root: a hive, optionally narrowed to a subkey prefix.
///
/// A redirected current-user root is the users hive narrowed to the
/// logged-in user's SID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootHandle {
    hive: Hive,
    prefix: Option<String>,
}

impl RootHandle {
    pub fn new(hive: Hive) -> Self {
        Self { hive, prefix: None }
    }

    pub fn redirected(hive: Hive, prefix: impl Into<String>) -> Self {
        Self {
            hive,
            prefix: Some(prefix.into()),
        }
    }

    pub fn hive(&self) -> Hive {
        self.hive
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn is_redirected(&self) -> bool {
        self.prefix.is_some()
    }

    /// Path of `sub_path` relative to the underlying hive.
    pub fn key_path(&self, sub_path: &str) -> String {
        match &self.prefix {
            Some(prefix) => join(prefix, sub_path),
            None => join("", sub_path),
        }
    }

    /// Fully qualified display path, used in logs and errors.
    pub fn display_path(&self, sub_path: &str) -> String {
        join(self.hive.canonical_name(), &self.key_path(sub_path))
    }
}

impl std::fmt::Display for RootHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_path(""))
    }
}

/// Open/read/write/delete over a hierarchical key/value namespace.
pub trait KeyValueStore: Send + Sync {
    /// Resolve a root name. Unrecognized names yield `None`.
    fn open_root(&self, root_name: &str) -> Option<RootHandle>;

    /// Read a value. A missing key or value is `Ok(None)`.
    fn read(&self, root: &RootHandle, sub_path: &str, value_name: &str)
    -> Result<Option<RegValue>>;

    /// Write a typed value, creating intermediate keys.
    fn write(
        &self,
        root: &RootHandle,
        sub_path: &str,
        value_name: &str,
        value: &RegValue,
    ) -> Result<()>;

    /// Delete a value. Deleting something absent succeeds.
    fn delete(&self, root: &RootHandle, sub_path: &str, value_name: &str) -> Result<()>;

    /// Read-compare against expected data, failing closed.
    ///
    /// Read errors are logged and reported as "not matching".
    fn matches(&self, root: &RootHandle, sub_path: &str, value_name: &str, expected: &str) -> bool {
        match self.read(root, sub_path, value_name) {
            Ok(actual) => value_matches(actual.as_ref(), expected),
            Err(e) => {
                tracing::debug!(
                    path = %root.display_path(sub_path),
                    value = value_name,
                    "read failed, treating as not matching: {}",
                    e
                );
                false
            }
        }
    }
}

/// Raw hive-relative I/O, implemented per platform.
pub trait RegistryBackend: Send + Sync {
    /// Names of the direct subkeys of `path` (empty path = hive root).
    fn subkey_names(&self, hive: Hive, path: &str) -> Result<Vec<String>>;

    /// Read a value; a missing key or value is `Ok(None)`.
    fn get_value(&self, hive: Hive, path: &str, name: &str) -> Result<Option<RegValue>>;

    /// Write a value, creating the key path with write intent.
    fn set_value(&self, hive: Hive, path: &str, name: &str, value: &RegValue) -> Result<()>;

    /// Remove a value; a missing key or value is not an error.
    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
enum SidMatcher {
    Prefix(&'static str),
    Pattern(Regex),
}

impl SidMatcher {
    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Prefix(prefix) => name
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
            Self::Pattern(regex) => regex.is_match(name),
        }
    }
}

/// Selection rule for the logged-in user's subkey under the users root.
#[derive(Debug, Clone)]
pub struct UserContext {
    sid_pattern: SidMatcher,
    excluded_suffix: String,
}

impl UserContext {
    /// Build a user context from a SID pattern and an excluded suffix.
    pub fn new(sid_pattern: &str, excluded_suffix: impl Into<String>) -> Result<Self> {
        let sid_pattern = Regex::new(sid_pattern).map_err(|e| Error::InvalidPattern {
            pattern: sid_pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            sid_pattern: SidMatcher::Pattern(sid_pattern),
            excluded_suffix: excluded_suffix.into(),
        })
    }

    /// True if `name` looks like an interactive user's SID subkey.
    pub fn is_interactive_user(&self, name: &str) -> bool {
        if !self.sid_pattern.is_match(name) {
            return false;
        }
        let suffix = self.excluded_suffix.to_lowercase();
        suffix.is_empty() || !name.to_lowercase().ends_with(&suffix)
    }

    /// First subkey name that qualifies, in enumeration order.
    pub fn select<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        names.into_iter().find(|name| self.is_interactive_user(name))
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            sid_pattern: SidMatcher::Prefix(DEFAULT_SID_PREFIX),
            excluded_suffix: DEFAULT_EXCLUDED_SUFFIX.to_string(),
        }
    }
}

/// Store over a [`RegistryBackend`] with alias resolution and
/// current-user redirection.
pub struct RegistryStore<B> {
    backend: B,
    user_context: UserContext,
}

impl<B: RegistryBackend> RegistryStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            user_context: UserContext::default(),
        }
    }

    pub fn with_user_context(mut self, user_context: UserContext) -> Self {
        self.user_context = user_context;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve the current-user root to the logged-in user's namespace.
    ///
    /// Falls back to the process's own current-user hive when no
    /// qualifying SID is found or the users root cannot be enumerated.
    fn resolve_current_user(&self) -> RootHandle {
        match self.backend.subkey_names(Hive::Users, "") {
            Ok(names) => {
                if let Some(sid) = self.user_context.select(names.iter().map(String::as_str)) {
                    tracing::debug!(sid, "redirecting current-user root");
                    return RootHandle::redirected(Hive::Users, sid);
                }
                tracing::debug!("no interactive user SID found, using process current user");
            }
            Err(e) => {
                tracing::warn!(
                    "failed to enumerate users root, falling back to process current user: {}",
                    e
                );
            }
        }
        RootHandle::new(Hive::CurrentUser)
    }
}

impl<B: RegistryBackend> KeyValueStore for RegistryStore<B> {
    fn open_root(&self, root_name: &str) -> Option<RootHandle> {
        match Hive::from_alias(root_name)? {
            Hive::CurrentUser => Some(self.resolve_current_user()),
            hive => Some(RootHandle::new(hive)),
        }
    }

    fn read(
        &self,
        root: &RootHandle,
        sub_path: &str,
        value_name: &str,
    ) -> Result<Option<RegValue>> {
        self.backend
            .get_value(root.hive(), &root.key_path(sub_path), value_name)
    }

    fn write(
        &self,
        root: &RootHandle,
        sub_path: &str,
        value_name: &str,
        value: &RegValue,
    ) -> Result<()> {
        self.backend
            .set_value(root.hive(), &root.key_path(sub_path), value_name, value)
    }

    fn delete(&self, root: &RootHandle, sub_path: &str, value_name: &str) -> Result<()> {
        self.backend
            .delete_value(root.hive(), &root.key_path(sub_path), value_name)
    }
}
