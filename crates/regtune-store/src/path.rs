//! Root-qualified key path parsing
//!
//! A raw key path such as `HKEY_LOCAL_MACHINE\SYSTEM\CurrentControlSet` is
//! split at the first separator into a root name and a sub-path. Root names
//! keep their original case; alias normalization happens when the root is
//! opened by a store.

/// Separator between key path segments.
pub const SEPARATOR: char = '\\';

/// A raw key path split into root name and sub-path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    root: String,
    sub_path: String,
}

impl KeyPath {
    /// Parse a raw, root-qualified key path.
    ///
    /// Surrounding whitespace and leading separators are trimmed. When no
    /// separator is present the whole string is the root and the sub-path
    /// is empty.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_start_matches(SEPARATOR);

        match trimmed.find(SEPARATOR) {
            Some(idx) => Self {
                root: trimmed[..idx].trim().to_string(),
                sub_path: trimmed[idx + SEPARATOR.len_utf8()..].trim().to_string(),
            },
            None => Self {
                root: trimmed.trim().to_string(),
                sub_path: String::new(),
            },
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// True when the path names a root without any sub-path.
    pub fn is_root_only(&self) -> bool {
        self.sub_path.is_empty()
    }

    /// Last non-empty segment of the path, falling back to the root name.
    pub fn last_segment(&self) -> &str {
        self.sub_path
            .rsplit(SEPARATOR)
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.root)
    }

    /// Iterate the non-empty segments of the sub-path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        split_segments(&self.sub_path)
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.sub_path.is_empty() {
            write!(f, "{}", self.root)
        } else {
            write!(f, "{}{}{}", self.root, SEPARATOR, self.sub_path)
        }
    }
}

impl From<&str> for KeyPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Split a raw key path into `(root, sub_path)`.
pub fn resolve(raw: &str) -> (String, String) {
    let path = KeyPath::parse(raw);
    (path.root, path.sub_path)
}

/// Iterate the non-empty segments of a sub-path.
pub fn split_segments(sub_path: &str) -> impl Iterator<Item = &str> {
    sub_path
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Join a prefix and a sub-path with a single separator.
pub fn join(prefix: &str, sub_path: &str) -> String {
    let prefix = prefix.trim_end_matches(SEPARATOR);
    let sub_path = sub_path.trim_start_matches(SEPARATOR);
    match (prefix.is_empty(), sub_path.is_empty()) {
        (true, _) => sub_path.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{}{}{}", prefix, SEPARATOR, sub_path),
    }
}
