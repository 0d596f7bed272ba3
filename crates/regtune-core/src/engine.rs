//! ReconciliationEngine implementation
//!
//! The engine compares items against the live store (check), drives the
//! store toward the selected state (apply), and re-derives selections from
//! the store (refresh). It never parses documents and never asks for
//! confirmation; both belong to its callers.

use regtune_catalog::{Catalog, CheckRule, Command, CommandKind, Item, PresetTable};
use regtune_store::{KeyPath, KeyValueStore, RootHandle};
use serde::Serialize;

use crate::runner::CommandRunner;
use crate::Result;

/// Category token that marks items whose effect needs a shell restart
pub const DEFAULT_RESTART_TOKEN: &str = "explorer";

/// Command used to restart the desktop shell
#[cfg(windows)]
pub const DEFAULT_RESTART_COMMAND: &str = "taskkill /f /im explorer.exe";
#[cfg(not(windows))]
pub const DEFAULT_RESTART_COMMAND: &str = "true";

/// Tunables for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Case-insensitive substring of an item category that flags a restart
    pub restart_token: String,
    /// Command line run by [`ReconciliationEngine::restart_subsystem`]
    pub restart_command: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            restart_token: DEFAULT_RESTART_TOKEN.to_string(),
            restart_command: DEFAULT_RESTART_COMMAND.to_string(),
        }
    }
}

/// An item whose command list did not complete cleanly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub title: String,
    pub errors: Vec<String>,
}

/// Summary of an apply pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Items whose command list ran without error
    pub success_count: usize,
    /// A successful item's category contained the restart token
    pub needs_restart: bool,
    /// Items that hit at least one command error
    pub failed: Vec<ItemFailure>,
    /// Display-only or locked items that were not touched
    pub skipped_display_only: usize,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Items the engine attempted, successful or not
    pub fn processed(&self) -> usize {
        self.success_count + self.failed.len()
    }
}

/// Direction of a pending change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Selected but not currently applied
    Apply,
    /// Applied but no longer selected
    Restore,
}

/// An item whose selection disagrees with the live store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingChange {
    pub title: String,
    pub kind: ChangeKind,
}

/// Outcome of one store command
enum Step {
    Done,
    Skipped,
}

/// Engine over a key/value store and a command runner
///
/// All operations are sequential. Callers must not run two operations
/// against the same catalog at once; [`crate::Session`] enforces that.
pub struct ReconciliationEngine<S, R> {
    store: S,
    runner: R,
    options: EngineOptions,
}

impl<S: KeyValueStore, R: CommandRunner> ReconciliationEngine<S, R> {
    pub fn new(store: S, runner: R) -> Self {
        Self {
            store,
            runner,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluate one rule. Unresolvable roots and read errors are false.
    pub fn check_rule(&self, rule: &CheckRule) -> bool {
        let path = rule.key_path();
        let Some(root) = self.store.open_root(path.root()) else {
            tracing::warn!(path = rule.raw_path(), "Unrecognized root, check skipped");
            return false;
        };

        let matched = self.store.matches(
            &root,
            path.sub_path(),
            rule.value_name(),
            rule.expected_data(),
        );
        tracing::debug!(
            path = rule.raw_path(),
            value = rule.value_name(),
            expected = rule.expected_data(),
            matched,
            "Checked rule"
        );
        matched
    }

    /// True iff the item has checks and every one of them matches.
    pub fn check_item(&self, item: &Item) -> bool {
        !item.checks().is_empty() && item.checks().iter().all(|rule| self.check_rule(rule))
    }

    /// Re-derive every item's selection from the store.
    ///
    /// Returns the number of items now reported applied.
    pub fn refresh(&self, catalog: &mut Catalog) -> usize {
        let mut applied = 0;
        for item in catalog.iter_mut() {
            let state = self.check_item(item);
            item.set_selected(state);
            if state {
                applied += 1;
            }
        }
        tracing::info!(items = catalog.len(), applied, "Refreshed catalog");
        applied
    }

    /// Items whose selection differs from the live check.
    ///
    /// Display-only and locked items never appear.
    pub fn pending_changes(&self, catalog: &Catalog) -> Vec<PendingChange> {
        catalog
            .iter()
            .filter(|item| item.is_applicable())
            .filter_map(|item| {
                let applied = self.check_item(item);
                let kind = match (item.is_selected(), applied) {
                    (true, false) => ChangeKind::Apply,
                    (false, true) => ChangeKind::Restore,
                    _ => return None,
                };
                Some(PendingChange {
                    title: item.title().to_string(),
                    kind,
                })
            })
            .collect()
    }

    /// Drive the store toward every item's selection.
    ///
    /// Selected items run their apply commands, unselected items their
    /// restore commands. A failing item is recorded and the pass moves on.
    pub fn apply(&self, catalog: &Catalog) -> ApplyReport {
        let mut report = ApplyReport::default();

        for item in catalog.iter() {
            if !item.is_applicable() {
                report.skipped_display_only += 1;
                continue;
            }

            let errors = self.run_item(item);
            if errors.is_empty() {
                report.success_count += 1;
                if self.triggers_restart(item) {
                    report.needs_restart = true;
                }
            } else {
                tracing::warn!(
                    title = item.title(),
                    errors = errors.len(),
                    "Item failed to apply"
                );
                report.failed.push(ItemFailure {
                    title: item.title().to_string(),
                    errors,
                });
            }
        }

        tracing::info!(
            succeeded = report.success_count,
            failed = report.failed.len(),
            skipped = report.skipped_display_only,
            needs_restart = report.needs_restart,
            "Apply finished"
        );
        report
    }

    /// Select items by preset. Pure in-memory; the store is not touched.
    pub fn apply_preset(
        &self,
        presets: &PresetTable,
        key: &str,
        catalog: &mut Catalog,
    ) -> Option<usize> {
        presets.apply(key, catalog)
    }

    /// Run the configured shell restart command.
    pub fn restart_subsystem(&self) -> Result<()> {
        tracing::info!(command = %self.options.restart_command, "Restarting shell subsystem");
        self.runner.run(&self.options.restart_command)
    }

    fn triggers_restart(&self, item: &Item) -> bool {
        let token = self.options.restart_token.to_lowercase();
        !token.is_empty() && item.category().to_lowercase().contains(&token)
    }

    /// Run the item's pending commands in order, collecting every error.
    fn run_item(&self, item: &Item) -> Vec<String> {
        let mut errors = Vec::new();
        for command in item.pending_commands() {
            match self.execute(command) {
                Ok(Step::Done) => {}
                Ok(Step::Skipped) => {
                    tracing::warn!(
                        title = item.title(),
                        path = command.raw_path(),
                        "Unrecognized root, command skipped"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        title = item.title(),
                        command = %command,
                        "Command failed: {}",
                        e
                    );
                    errors.push(format!("{command}: {e}"));
                }
            }
        }
        errors
    }

    fn execute(&self, command: &Command) -> Result<Step> {
        tracing::debug!(command = %command, "Executing");

        match command.kind() {
            CommandKind::Shell => self.runner.run(command.data())?,
            CommandKind::Write => {
                let Some((root, path)) = self.resolve(command) else {
                    return Ok(Step::Skipped);
                };
                self.store.write(
                    &root,
                    path.sub_path(),
                    command.value_name(),
                    &command.typed_value(),
                )?;
            }
            CommandKind::Delete => {
                let Some((root, path)) = self.resolve(command) else {
                    return Ok(Step::Skipped);
                };
                self.store
                    .delete(&root, path.sub_path(), command.value_name())?;
            }
        }
        Ok(Step::Done)
    }

    fn resolve(&self, command: &Command) -> Option<(RootHandle, KeyPath)> {
        let path = command.key_path();
        let root = self.store.open_root(path.root())?;
        Some((root, path))
    }
}
