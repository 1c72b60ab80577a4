//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::{ForwardError, StreamNotEstablished, StreamShutdown};
// Observer traits and boxed observers
pub use crate::observer::{
  BoxedTerminatingObserver, IntoBoxedObserver, Observer, TerminatingObserver,
};
// Shared observer handles
pub use crate::rc::MutArc;
// The guard
pub use crate::resettable::ResettableObserver;
