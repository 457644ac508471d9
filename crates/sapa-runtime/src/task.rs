//! Deferred units of work.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::{panic_message, BoxError, TaskError};

type BlockingFn<T> = Box<dyn FnOnce() -> Result<T, BoxError> + Send + 'static>;
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send + 'static>>;

enum Work<T> {
    Blocking(BlockingFn<T>),
    Future(BoxFuture<T>),
}

/// A computation producing `T` or failing, executed exactly once.
///
/// The work must not touch UI state: it runs on a worker, not on the UI
/// context.
pub struct Task<T> {
    work: Work<T>,
}

impl<T: Send + 'static> Task<T> {
    /// A blocking closure, run on the blocking pool.
    pub fn blocking<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            work: Work::Blocking(Box::new(move || f().map_err(Into::into))),
        }
    }

    /// A future, run on the async runtime.
    pub fn future<Fut, E>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            work: Work::Future(Box::pin(async move { fut.await.map_err(Into::into) })),
        }
    }

    /// Execute on a fresh worker unit and wait for the outcome.
    ///
    /// Must be called from within a tokio runtime. Panics and shutdown
    /// cancellation are turned into errors, never propagated.
    pub(crate) async fn execute(self) -> Result<T, TaskError> {
        let joined = match self.work {
            Work::Blocking(f) => tokio::task::spawn_blocking(f).await,
            Work::Future(fut) => tokio::spawn(fut).await,
        };

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(TaskError::Failed(err)),
            Err(join) if join.is_panic() => {
                Err(TaskError::Panicked(panic_message(join.into_panic().as_ref())))
            }
            Err(_) => Err(TaskError::Interrupted),
        }
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.work {
            Work::Blocking(_) => "blocking",
            Work::Future(_) => "future",
        };
        f.debug_struct("Task").field("kind", &kind).finish()
    }
}
