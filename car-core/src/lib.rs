//! # car-core
//!
//! Pure logic for carsync (no I/O, instant tests).
//!
//! This crate implements the list synchronization state machine, request
//! sequencing, local search and collection statistics without any network
//! or timer I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (HTTP, debounce timers) is performed by `car-client`, which
//! interprets the actions produced by these state machines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod filter;
pub mod format;
pub mod sequence;
pub mod state;
pub mod stats;

pub use filter::{filter, matches};
pub use format::{format_currency, format_price};
pub use sequence::{RequestSeq, SequenceGate};
pub use state::{Action, Event, ListSnapshot, SyncMachine, SyncState, Trigger};
pub use stats::CollectionStats;
