//! Shared test utilities for the regtune workspace.
//!
//! This crate provides recording test doubles and builders so engine and
//! session suites can assert exactly what was touched. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`store`]: [`FakeStore`], a scriptable store that logs every operation
//! - [`runner`]: [`RecordingRunner`], a command runner that logs lines
//! - [`item`]: [`ItemBuilder`] for terse item fixtures
//! - [`journal`]: [`Journal`], one event log shared by both fakes

pub mod item;
pub mod journal;
pub mod runner;
pub mod store;

pub use item::ItemBuilder;
pub use journal::{Event, Journal};
pub use runner::RecordingRunner;
pub use store::{FakeStore, StoreOp};
