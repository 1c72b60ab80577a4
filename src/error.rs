//! Errors reported by [`ResettableObserver`](crate::ResettableObserver).
//!
//! The two structural failures are separate types so callers can match on
//! them independently: [`StreamNotEstablished`] may go away after the next
//! reconnect, [`StreamShutdown`] never will.

use thiserror::Error;

/// No transport has been attached to the stream yet.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("stream has not been established, requires reset")]
pub struct StreamNotEstablished;

/// The stream was shut down and can not be used again.
///
/// Also the cause handed to
/// [`TerminatingObserver::terminate`](crate::observer::TerminatingObserver::terminate).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("stream is shut down")]
pub struct StreamShutdown;

/// Failure of a forwarded `next`, `error` or `complete` call.
///
/// `E` is the error type of the installed delegate observer; its failures are
/// passed through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwardError<E> {
  #[error(transparent)]
  NotEstablished(#[from] StreamNotEstablished),

  #[error(transparent)]
  Shutdown(#[from] StreamShutdown),

  #[error(transparent)]
  Delegate(E),
}

impl<E> ForwardError<E> {
  #[inline]
  pub fn is_not_established(&self) -> bool { matches!(self, Self::NotEstablished(_)) }

  #[inline]
  pub fn is_shutdown(&self) -> bool { matches!(self, Self::Shutdown(_)) }

  /// The delegate's own failure, if that is what this is.
  pub fn into_delegate(self) -> Option<E> {
    match self {
      Self::Delegate(e) => Some(e),
      _ => None,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn kinds_are_distinct() {
    let not_established: ForwardError<()> = StreamNotEstablished.into();
    let shutdown: ForwardError<()> = StreamShutdown.into();

    assert!(not_established.is_not_established());
    assert!(!not_established.is_shutdown());
    assert!(shutdown.is_shutdown());
    assert!(!shutdown.is_not_established());
    assert_ne!(not_established, shutdown);
  }

  #[test]
  fn messages() {
    assert_eq!(StreamShutdown.to_string(), "stream is shut down");
    assert_eq!(
      ForwardError::<std::io::Error>::from(StreamNotEstablished).to_string(),
      "stream has not been established, requires reset"
    );
  }

  #[test]
  fn delegate_failure_passes_through() {
    let err = ForwardError::Delegate("broken pipe");
    assert!(!err.is_shutdown());
    assert_eq!(err.into_delegate(), Some("broken pipe"));
  }
}
