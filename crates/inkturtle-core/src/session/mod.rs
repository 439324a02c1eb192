//! Session log persistence.
//!
//! Each canvas keeps an ordered log of the persistable actions applied to
//! it, keyed by canvas id. Remounting a canvas replays this log through
//! the interpreter to reconstruct the scene.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::action::TurtleAction;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Session error: {0}")]
    Other(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for session log backends.
///
/// Implementations can keep logs in memory, on the filesystem, or in a
/// remote store. Loading an unknown canvas id yields an empty log, not an
/// error; a canvas with no history is simply blank.
pub trait SessionStore: Send + Sync {
    /// Append one action to a canvas log.
    fn append(&self, canvas: &str, action: &TurtleAction) -> BoxFuture<'_, SessionResult<()>>;

    /// Load a canvas log in append order.
    fn load(&self, canvas: &str) -> BoxFuture<'_, SessionResult<Vec<TurtleAction>>>;

    /// Drop every logged action belonging to one turtle.
    fn remove_turtle(&self, canvas: &str, turtle: &str) -> BoxFuture<'_, SessionResult<()>>;

    /// Delete a canvas log entirely.
    fn clear(&self, canvas: &str) -> BoxFuture<'_, SessionResult<()>>;

    /// Check whether a canvas has a stored log.
    fn exists(&self, canvas: &str) -> BoxFuture<'_, SessionResult<bool>>;
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn append(&self, canvas: &str, action: &TurtleAction) -> BoxFuture<'_, SessionResult<()>> {
        (**self).append(canvas, action)
    }

    fn load(&self, canvas: &str) -> BoxFuture<'_, SessionResult<Vec<TurtleAction>>> {
        (**self).load(canvas)
    }

    fn remove_turtle(&self, canvas: &str, turtle: &str) -> BoxFuture<'_, SessionResult<()>> {
        (**self).remove_turtle(canvas, turtle)
    }

    fn clear(&self, canvas: &str) -> BoxFuture<'_, SessionResult<()>> {
        (**self).clear(canvas)
    }

    fn exists(&self, canvas: &str) -> BoxFuture<'_, SessionResult<bool>> {
        (**self).exists(canvas)
    }
}

#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
