//! Shared log interleaving store calls and shell lines

use std::sync::{Arc, Mutex};

use crate::store::StoreOp;

/// One side effect seen by a fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Store(StoreOp),
    Shell(String),
}

impl Event {
    /// Store reads are observations, everything else changes state.
    pub fn is_effect(&self) -> bool {
        match self {
            Self::Store(op) => op.is_mutation(),
            Self::Shell(_) => true,
        }
    }
}

/// Cloneable handle to one ordered event log.
///
/// Hand the same journal to a [`FakeStore`](crate::FakeStore) and a
/// [`RecordingRunner`](crate::RecordingRunner) to see their calls in the
/// order the engine made them.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Events without store reads.
    pub fn effects(&self) -> Vec<Event> {
        self.events().into_iter().filter(Event::is_effect).collect()
    }
}
