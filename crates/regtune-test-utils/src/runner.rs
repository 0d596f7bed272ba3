//! Command runner that records lines instead of spawning

use std::collections::BTreeSet;
use std::sync::Mutex;

use regtune_core::{CommandRunner, Error, Result};

use crate::journal::{Event, Journal};

#[derive(Debug, Default)]
pub struct RecordingRunner {
    lines: Mutex<Vec<String>>,
    failing: BTreeSet<String>,
    journal: Option<Journal>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `line` fail as if the interpreter could not start.
    pub fn fail_on(mut self, line: &str) -> Self {
        self.failing.insert(line.to_string());
        self
    }

    /// Also append every line to `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
        if let Some(journal) = &self.journal {
            journal.record(Event::Shell(line.to_string()));
        }

        if self.failing.contains(line) {
            return Err(Error::Spawn {
                line: line.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "interpreter missing"),
            });
        }
        Ok(())
    }
}
