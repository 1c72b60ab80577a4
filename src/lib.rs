//! # rxstream-guard: resettable observers for reconnecting streams
//!
//! A bidirectional network stream is written to through an observer: `next`
//! for every message, `error` or `complete` to half-close it. When the
//! connection drops, the transport builds a new observer, and when the owner
//! shuts down, the current one has to be torn down exactly once.
//!
//! [`ResettableObserver`] sits between the code that sends and those
//! transport observers:
//!
//! | Operation | Unset | Active | Poisoned |
//! |-----------|-------|--------|----------|
//! | `reset(d)` | becomes Active(d) | replaces the delegate | [`StreamShutdown`] |
//! | `next` / `error` / `complete` | [`StreamNotEstablished`] | forwarded | [`StreamShutdown`] |
//! | `poison()` | becomes Poisoned | terminates the delegate, becomes Poisoned | no-op |
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events, each of which may fail |
//! | [`TerminatingObserver`] | An observer the stream owner can terminate once |
//! | [`ResettableObserver`] | The guard: forwards to the current delegate, resettable, poisonable |
//! | [`MutArc`] | Shared handle so the transport keeps ownership of its observer |
//!
//! ## Logging
//!
//! The guard emits [`tracing`] events carrying a `stream` field with the
//! guard's label. No subscriber is installed by this crate.
//!
//! [`Observer`]: observer::Observer
//! [`TerminatingObserver`]: observer::TerminatingObserver
//! [`MutArc`]: rc::MutArc
//! [`StreamShutdown`]: error::StreamShutdown
//! [`StreamNotEstablished`]: error::StreamNotEstablished

pub mod error;
pub mod observer;
pub mod prelude;
pub mod rc;
pub mod resettable;

pub use prelude::*;
