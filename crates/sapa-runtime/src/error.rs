//! Error types for the task runner.

use std::any::Any;
use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error returned by task closures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Outcome delivered to `on_error`.
///
/// `Failed` carries whatever the task itself returned. The other variants
/// are runner-internal failures; callers that care can match on them.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task returned an error.
    #[error("{0}")]
    Failed(#[source] BoxError),

    /// The task panicked on its worker.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The worker was shut down before the task completed.
    #[error("worker interrupted before the task completed")]
    Interrupted,
}

impl TaskError {
    /// Wrap a task failure.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }

    /// Returns true if the failure came from the runner rather than the task.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Downcast the wrapped task error.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Failed(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Errors from the runner plumbing itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    /// The UI context was dropped; nothing will run posted jobs.
    #[error("UI context is closed")]
    UiClosed,
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("bad")]
    struct Bad;

    #[test]
    fn test_failed_wraps_source() {
        let err = TaskError::failed(Bad);
        assert_eq!(err.to_string(), "bad");
        assert!(err.downcast_ref::<Bad>().is_some());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_errors() {
        assert!(TaskError::Interrupted.is_internal());
        assert!(TaskError::Panicked("boom".into()).downcast_ref::<Bad>().is_none());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(3_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
