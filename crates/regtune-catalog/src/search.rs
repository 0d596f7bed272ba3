//! Lowercased full-text index over item metadata and key names
//!
//! Besides the visible text, every apply command contributes its value
//! name and the last segment of its key path, so typing a known value
//! name finds the item that owns it.

use crate::model::Command;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    text: String,
}

impl SearchIndex {
    pub fn build(
        title: &str,
        description: &str,
        category: &str,
        tags: &str,
        apply_commands: &[Command],
    ) -> Self {
        let mut parts: Vec<&str> = vec![title, description, category, tags];
        let mut segments = Vec::new();

        for cmd in apply_commands {
            if !cmd.value_name().is_empty() {
                parts.push(cmd.value_name());
            }
            if !cmd.raw_path().trim().is_empty() {
                segments.push(cmd.key_path().last_segment().to_string());
            }
        }
        parts.extend(segments.iter().map(String::as_str));

        Self {
            text: parts.join(" ").to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Blank queries match everything; otherwise every whitespace-separated
    /// keyword must appear in the index.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        query
            .split_whitespace()
            .all(|keyword| self.text.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn index(title: &str) -> SearchIndex {
        SearchIndex::build(title, "", "", "", &[])
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_query_matches(#[case] query: &str) {
        assert!(index("anything").matches(query));
        assert!(SearchIndex::default().matches(query));
    }

    #[rstest]
    #[case("sysmain disable", true)]
    #[case("SYSMAIN", true)]
    #[case("  disable   sys ", true)]
    #[case("sysmain foo", false)]
    #[case("foo", false)]
    fn test_and_semantics(#[case] query: &str, #[case] expected: bool) {
        assert_eq!(index("Disable SysMain").matches(query), expected);
    }

    #[test]
    fn test_key_names_are_indexed() {
        let commands = vec![
            Command::write(
                r"HKLM\SYSTEM\CurrentControlSet\Control\Session Manager\Power",
                "HiberbootEnabled",
                "REG_DWORD",
                "0",
            ),
            Command::shell("powercfg -h off"),
        ];
        let idx = SearchIndex::build("Fast startup", "", "System", "boot", &commands);
        assert!(idx.matches("hiberbootenabled"));
        assert!(idx.matches("power"));
        assert!(idx.matches("boot system"));
        assert!(!idx.matches("session"));
        assert!(!idx.matches("powercfg"));
    }
}
