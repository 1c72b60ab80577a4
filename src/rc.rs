use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
  error::StreamShutdown,
  observer::{Observer, TerminatingObserver},
};

/// A shared, thread-safe handle to an observer.
///
/// The transport layer keeps one clone and installs another into a
/// [`ResettableObserver`](crate::ResettableObserver), so the transport stays
/// owned by whoever created it while the guard only forwards to it.
#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  /// Locks the observer behind this handle.
  ///
  /// A panic inside an earlier observer call does not make the handle
  /// unusable for its owner: a poisoned lock hands out the observer anyway.
  #[inline]
  pub fn lock(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }

  /// Returns `true` if both handles point at the same observer.
  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> From<T> for MutArc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T, Item, Err> Observer<Item, Err> for MutArc<T>
where
  T: Observer<Item, Err>,
{
  type Error = T::Error;

  fn next(&mut self, value: Item) -> Result<(), Self::Error> { self.lock().next(value) }

  fn error(&mut self, err: Err) -> Result<(), Self::Error> { self.lock().error(err) }

  fn complete(&mut self) -> Result<(), Self::Error> { self.lock().complete() }
}

impl<T, Item, Err> TerminatingObserver<Item, Err> for MutArc<T>
where
  T: TerminatingObserver<Item, Err>,
{
  fn terminate(&mut self, cause: StreamShutdown) -> Result<(), Self::Error> {
    self.lock().terminate(cause)
  }
}
