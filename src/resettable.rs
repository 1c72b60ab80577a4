//! A resettable, poisonable guard in front of a stream observer.
//!
//! Reconnecting streams replace their transport every time the connection
//! drops. [`ResettableObserver`] gives the rest of the application one stable
//! [`Observer`] to send through, while the transport layer swaps the delegate
//! underneath it with [`reset`](ResettableObserver::reset) and finally shuts
//! the stream down with [`poison`](ResettableObserver::poison).
//!
//! ```rust
//! use std::convert::Infallible;
//! use rxstream_guard::prelude::*;
//!
//! #[derive(Default)]
//! struct Wire(Vec<u32>);
//!
//! impl Observer<u32, Infallible> for Wire {
//!   type Error = Infallible;
//!   fn next(&mut self, v: u32) -> Result<(), Infallible> {
//!     self.0.push(v);
//!     Ok(())
//!   }
//!   fn error(&mut self, _: Infallible) -> Result<(), Infallible> { Ok(()) }
//!   fn complete(&mut self) -> Result<(), Infallible> { Ok(()) }
//! }
//!
//! impl TerminatingObserver<u32, Infallible> for Wire {
//!   fn terminate(&mut self, _: StreamShutdown) -> Result<(), Infallible> { Ok(()) }
//! }
//!
//! let guard = ResettableObserver::<MutArc<Wire>, u32, Infallible>::new();
//! assert!(guard.next(1).unwrap_err().is_not_established());
//!
//! let wire = MutArc::own(Wire::default());
//! guard.reset(wire.clone()).unwrap();
//! guard.next(2).unwrap();
//! assert_eq!(wire.lock().0, vec![2]);
//!
//! guard.poison();
//! assert!(guard.next(3).unwrap_err().is_shutdown());
//! assert!(guard.reset(wire).is_err());
//! ```

use std::{
  borrow::Cow,
  fmt::{self, Debug},
  marker::PhantomData,
  mem,
  sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError},
};

use tracing::{debug, trace, warn};

use crate::{
  error::{ForwardError, StreamNotEstablished, StreamShutdown},
  observer::{Observer, TerminatingObserver},
};

const DEFAULT_LABEL: &str = "stream";

enum State<O> {
  Unset,
  Active {
    delegate: O,
    /// An `error` or `complete` already went through to `delegate`.
    closed: bool,
  },
  Poisoned,
}

impl<O> State<O> {
  fn tag(&self) -> &'static str {
    match self {
      State::Unset => "Unset",
      State::Active { closed: false, .. } => "Active",
      State::Active { closed: true, .. } => "Closed",
      State::Poisoned => "Poisoned",
    }
  }
}

/// Guard that forwards `next`, `error` and `complete` to the current delegate
/// observer of a stream.
///
/// The guard starts out empty. [`reset`](Self::reset) installs a delegate,
/// replacing (and dropping) any previous one without notifying it.
/// [`poison`](Self::poison) shuts the guard down for good: the current
/// delegate, if any, receives [`TerminatingObserver::terminate`] exactly once,
/// and every later call fails with [`StreamShutdown`].
///
/// # Locking
///
/// Every operation runs under one mutex, and delegate methods are called while
/// it is held. Events therefore reach a delegate in the order callers entered
/// the guard, and a concurrent `reset` or `poison` can never swap the delegate
/// out from under a forward in progress. The flip side: a delegate call that
/// blocks also blocks every other caller of the same guard, and a delegate must
/// not call back into the guard that forwards to it.
pub struct ResettableObserver<O, Item, Err> {
  label: Cow<'static, str>,
  state: Mutex<State<O>>,
  _marker: PhantomData<fn(Item, Err)>,
}

impl<O, Item, Err> ResettableObserver<O, Item, Err> {
  pub fn new() -> Self { Self::with_label(DEFAULT_LABEL) }

  /// Creates an empty guard whose log events carry `label` as the `stream`
  /// field.
  pub fn with_label(label: impl Into<Cow<'static, str>>) -> Self {
    Self { label: label.into(), state: Mutex::new(State::Unset), _marker: PhantomData }
  }

  #[inline]
  pub fn label(&self) -> &str { &self.label }

  /// Returns `true` once [`poison`](Self::poison) has been called.
  pub fn is_poisoned(&self) -> bool { matches!(*self.state(), State::Poisoned) }

  /// Returns `true` when there is no open stream to send on: no delegate was
  /// installed yet, the guard is poisoned, or the current delegate already saw
  /// `error` or `complete`. A successful `reset` opens the stream again.
  pub fn is_closed(&self) -> bool {
    match &*self.state() {
      State::Active { closed, .. } => *closed,
      State::Unset | State::Poisoned => true,
    }
  }

  /// Installs `delegate` as the observer all further events go to.
  ///
  /// A previously installed delegate is dropped without being terminated;
  /// replacing the transport on reconnect is not a failure.
  ///
  /// # Errors
  ///
  /// Returns [`StreamShutdown`] if the guard was poisoned. `delegate` is then
  /// dropped untouched.
  pub fn reset(&self, delegate: O) -> Result<(), StreamShutdown> {
    let mut state = self.state();
    let replaced = match &*state {
      State::Poisoned => {
        trace!(stream = %self.label, "reset rejected, stream is shut down");
        return Err(StreamShutdown);
      }
      State::Unset => false,
      State::Active { .. } => true,
    };
    *state = State::Active { delegate, closed: false };
    debug!(stream = %self.label, replaced, "stream observer reset");
    Ok(())
  }

  // The std mutex is only poisoned by a panicking delegate call, which never
  // leaves the state half-written.
  fn state(&self) -> MutexGuard<'_, State<O>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<O, Item, Err> ResettableObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  /// Sends `value` to the current delegate.
  pub fn next(&self, value: Item) -> Result<(), ForwardError<O::Error>> {
    self.forward("next", false, |delegate| delegate.next(value))
  }

  /// Sends `err` to the current delegate.
  pub fn error(&self, err: Err) -> Result<(), ForwardError<O::Error>> {
    self.forward("error", true, |delegate| delegate.error(err))
  }

  /// Completes the current delegate.
  pub fn complete(&self) -> Result<(), ForwardError<O::Error>> {
    self.forward("complete", true, |delegate| delegate.complete())
  }

  fn forward(
    &self, event: &'static str, closes: bool,
    send: impl FnOnce(&mut O) -> Result<(), O::Error>,
  ) -> Result<(), ForwardError<O::Error>> {
    let mut state = self.state();
    match &mut *state {
      State::Active { delegate, closed } => {
        send(delegate).map_err(ForwardError::Delegate)?;
        if closes {
          *closed = true;
        }
        Ok(())
      }
      State::Unset => {
        trace!(stream = %self.label, event, "forward rejected, stream not established");
        Err(StreamNotEstablished.into())
      }
      State::Poisoned => {
        trace!(stream = %self.label, event, "forward rejected, stream is shut down");
        Err(StreamShutdown.into())
      }
    }
  }
}

impl<O, Item, Err> ResettableObserver<O, Item, Err>
where
  O: TerminatingObserver<Item, Err>,
  O::Error: Debug,
{
  /// Shuts the guard down permanently.
  ///
  /// If a delegate is installed it is terminated with [`StreamShutdown`] and
  /// released. Calling `poison` again does nothing.
  ///
  /// The guard is marked poisoned before the delegate is terminated, so a
  /// failing or panicking `terminate` still leaves it shut down. A failure
  /// reported by `terminate` is logged and otherwise ignored.
  pub fn poison(&self) {
    let mut state = self.state();
    match mem::replace(&mut *state, State::Poisoned) {
      State::Poisoned => {}
      State::Unset => debug!(stream = %self.label, "stream poisoned before it was established"),
      State::Active { mut delegate, .. } => {
        debug!(stream = %self.label, "stream poisoned, terminating delegate");
        if let Err(err) = delegate.terminate(StreamShutdown) {
          warn!(stream = %self.label, error = ?err, "delegate failed to terminate");
        }
      }
    }
  }
}

impl<O, Item, Err> Default for ResettableObserver<O, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<O, Item, Err> Debug for ResettableObserver<O, Item, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut d = f.debug_struct("ResettableObserver");
    d.field("label", &self.label);
    match self.state.try_lock() {
      Ok(state) => d.field("state", &state.tag()),
      Err(TryLockError::Poisoned(err)) => d.field("state", &err.into_inner().tag()),
      Err(TryLockError::WouldBlock) => d.field("state", &format_args!("<locked>")),
    };
    d.finish_non_exhaustive()
  }
}

// ============================================================================
// Observer implementations for the guard
// ============================================================================

macro_rules! impl_observer_for_guard {
  ($ty:ty, generics = [$($generics:tt)*]) => {
    impl<$($generics)*> Observer<Item, Err> for $ty
    where
      O: Observer<Item, Err>,
    {
      type Error = ForwardError<O::Error>;

      #[inline]
      fn next(&mut self, value: Item) -> Result<(), Self::Error> {
        ResettableObserver::next(&**self, value)
      }

      #[inline]
      fn error(&mut self, err: Err) -> Result<(), Self::Error> {
        ResettableObserver::error(&**self, err)
      }

      #[inline]
      fn complete(&mut self) -> Result<(), Self::Error> {
        ResettableObserver::complete(&**self)
      }
    }
  };
}

impl_observer_for_guard!(&'a ResettableObserver<O, Item, Err>, generics = ['a, O, Item, Err]);
impl_observer_for_guard!(Arc<ResettableObserver<O, Item, Err>>, generics = [O, Item, Err]);

impl<O, Item, Err> Observer<Item, Err> for ResettableObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  type Error = ForwardError<O::Error>;

  #[inline]
  fn next(&mut self, value: Item) -> Result<(), Self::Error> {
    ResettableObserver::next(&*self, value)
  }

  #[inline]
  fn error(&mut self, err: Err) -> Result<(), Self::Error> { ResettableObserver::error(&*self, err) }

  #[inline]
  fn complete(&mut self) -> Result<(), Self::Error> { ResettableObserver::complete(&*self) }
}

// ============================================================================
// Tests
// ============================================================================
