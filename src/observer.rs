//! Observer traits for stream transports
//!
//! An [`Observer`] consumes `next`, `error`, and `complete` events. Unlike a
//! purely in-process observer, the observer of a network stream can fail: the
//! bytes may never reach the wire, so every method reports its own outcome.
//!
//! A [`TerminatingObserver`] is the observer a transport hands out for one
//! physical connection. On top of the regular events it accepts a single
//! `terminate` notification when its owner shuts the stream down for good.

use crate::error::StreamShutdown;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: the sending half of a bidirectional stream.
///
/// `Item` is the message type, `Err` the error type that can be sent to the
/// peer. `Error` is the failure raised by the observer itself when it cannot
/// accept an event.
pub trait Observer<Item, Err> {
  /// Failure raised by the observer while handling an event.
  type Error;

  /// Send the next value.
  fn next(&mut self, value: Item) -> Result<(), Self::Error>;

  /// Half-close the stream with an error.
  fn error(&mut self, err: Err) -> Result<(), Self::Error>;

  /// Half-close the stream normally.
  fn complete(&mut self) -> Result<(), Self::Error>;
}

// ============================================================================
// TerminatingObserver Trait
// ============================================================================

/// An [`Observer`] that can be torn down from the outside.
///
/// `terminate` is delivered at most once, when the owner of the stream shuts
/// it down permanently. Implementations are expected to release the
/// underlying transport without waiting for the peer.
pub trait TerminatingObserver<Item, Err>: Observer<Item, Err> {
  fn terminate(&mut self, cause: StreamShutdown) -> Result<(), Self::Error>;
}

// ============================================================================
// Observer implementations for boxed observers
// ============================================================================

impl<O, Item, Err> Observer<Item, Err> for Box<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  type Error = O::Error;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Self::Error> { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) -> Result<(), Self::Error> { (**self).error(err) }

  #[inline]
  fn complete(&mut self) -> Result<(), Self::Error> { (**self).complete() }
}

impl<O, Item, Err> TerminatingObserver<Item, Err> for Box<O>
where
  O: TerminatingObserver<Item, Err> + ?Sized,
{
  #[inline]
  fn terminate(&mut self, cause: StreamShutdown) -> Result<(), Self::Error> {
    (**self).terminate(cause)
  }
}

// ============================================================================
// IntoBoxedObserver Trait
// ============================================================================

/// Boxed terminating observer with Send bound.
///
/// Lets a reconnecting transport install a different concrete observer type
/// on every connection while the guard keeps a single type.
pub type BoxedTerminatingObserver<'a, Item, Err, E> =
  Box<dyn TerminatingObserver<Item, Err, Error = E> + Send + 'a>;

/// Helper trait to convert observers into boxed trait objects
pub trait IntoBoxedObserver<O> {
  fn into_boxed(self) -> O;
}

impl<'a, Item, Err, E, O> IntoBoxedObserver<BoxedTerminatingObserver<'a, Item, Err, E>> for O
where
  O: TerminatingObserver<Item, Err, Error = E> + Send + 'a,
{
  fn into_boxed(self) -> BoxedTerminatingObserver<'a, Item, Err, E> { Box::new(self) }
}

// ============================================================================
// Tests
// ============================================================================
