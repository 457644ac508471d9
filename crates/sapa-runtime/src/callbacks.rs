//! Lifecycle callbacks delivered on the UI context.

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};

use crate::error::{panic_message, TaskError};

pub(crate) type Hook<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;
pub(crate) type SuccessFn<S, T> = Box<dyn FnOnce(&mut S, T) + Send + 'static>;
pub(crate) type ErrorFn<S> = Box<dyn FnOnce(&mut S, TaskError) + Send + 'static>;

/// Where the UI shows messages that nobody else handled.
pub trait MessageSurface {
    /// Show an error to the user.
    fn show_error(&mut self, message: String);

    /// Show a busy indicator.
    fn show_progress(&mut self, _message: &str) {}

    /// Hide the busy indicator.
    fn hide_progress(&mut self) {}
}

/// Default `on_error`: report the failure through the message surface.
pub fn default_error_handler<S: MessageSurface>(state: &mut S, error: TaskError) {
    warn!(error = %error, "Database operation failed");
    state.show_error(format!("Database operation failed: {}", error));
}

/// The four lifecycle hooks of one runner invocation.
pub struct Callbacks<S, T> {
    pub(crate) on_start: Option<Hook<S>>,
    pub(crate) on_success: SuccessFn<S, T>,
    pub(crate) on_error: ErrorFn<S>,
    pub(crate) on_finish: Option<Hook<S>>,
}

impl<S: 'static, T: 'static> Callbacks<S, T> {
    /// Callbacks with explicit success and error handlers.
    pub fn new<OnSuccess, OnError>(on_success: OnSuccess, on_error: OnError) -> Self
    where
        OnSuccess: FnOnce(&mut S, T) + Send + 'static,
        OnError: FnOnce(&mut S, TaskError) + Send + 'static,
    {
        Self {
            on_start: None,
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
            on_finish: None,
        }
    }

    /// Run `f` on the UI context before the task starts.
    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Run `f` on the UI context after success or error, whatever happened.
    pub fn on_finish<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.on_finish = Some(Box::new(f));
        self
    }

    /// Split off the start hook; the rest is the completion.
    pub(crate) fn into_parts(self) -> (Option<Hook<S>>, Completion<S, T>) {
        (
            self.on_start,
            Completion {
                on_success: self.on_success,
                on_error: self.on_error,
                on_finish: self.on_finish,
            },
        )
    }
}

impl<S: MessageSurface + 'static, T: 'static> Callbacks<S, T> {
    /// Callbacks whose errors go to [`default_error_handler`].
    pub fn with_default_error<OnSuccess>(on_success: OnSuccess) -> Self
    where
        OnSuccess: FnOnce(&mut S, T) + Send + 'static,
    {
        Self::new(on_success, default_error_handler::<S>)
    }

    /// Show a progress indicator from start until the outcome is known.
    ///
    /// The indicator is hidden before the success or error handler runs.
    pub fn with_progress(self, message: impl Into<String>) -> Self {
        let message = message.into();
        let Self {
            on_start,
            on_success,
            on_error,
            on_finish,
        } = self;

        Self {
            on_start: Some(Box::new(move |state: &mut S| {
                if let Some(start) = on_start {
                    start(state);
                }
                state.show_progress(&message);
            })),
            on_success: Box::new(move |state: &mut S, value| {
                state.hide_progress();
                on_success(state, value);
            }),
            on_error: Box::new(move |state: &mut S, err| {
                state.hide_progress();
                on_error(state, err);
            }),
            on_finish,
        }
    }
}

/// Hooks that run once the task's outcome is known.
pub(crate) struct Completion<S, T> {
    on_success: SuccessFn<S, T>,
    on_error: ErrorFn<S>,
    on_finish: Option<Hook<S>>,
}

impl<S, T> Completion<S, T> {
    /// Run exactly one of success/error, then finish.
    ///
    /// `on_finish` runs even if the success/error handler panics; the panic
    /// is resumed afterwards so it reaches the UI context's handler. When
    /// both panic, the handler's panic is the one resumed.
    pub(crate) fn deliver(self, state: &mut S, outcome: Result<T, TaskError>) {
        let Self {
            on_success,
            on_error,
            on_finish,
        } = self;

        let handled = panic::catch_unwind(AssertUnwindSafe(|| match outcome {
            Ok(value) => on_success(state, value),
            Err(err) => on_error(state, err),
        }));

        let finished = match on_finish {
            Some(finish) => panic::catch_unwind(AssertUnwindSafe(|| finish(state))),
            None => Ok(()),
        };

        match (handled, finished) {
            (Err(payload), Err(second)) => {
                error!(
                    panic = %panic_message(second.as_ref()),
                    "on_finish panicked after the outcome handler panicked"
                );
                panic::resume_unwind(payload);
            }
            (Err(payload), Ok(())) | (Ok(()), Err(payload)) => panic::resume_unwind(payload),
            (Ok(()), Ok(())) => {}
        }
    }
}

/// Optional hooks for [`TaskRunner::run_for_table`](crate::TaskRunner::run_for_table).
///
/// Without an explicit error handler, failures go to the message surface.
pub struct TableCallbacks<S> {
    pub(crate) on_error: Option<ErrorFn<S>>,
    pub(crate) on_start: Option<Hook<S>>,
    pub(crate) on_finish: Option<Hook<S>>,
}

impl<S> Default for TableCallbacks<S> {
    fn default() -> Self {
        Self {
            on_error: None,
            on_start: None,
            on_finish: None,
        }
    }
}

impl<S: 'static> TableCallbacks<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut S, TaskError) + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_finish<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.on_finish = Some(Box::new(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Screen {
        log: Vec<String>,
    }

    impl MessageSurface for Screen {
        fn show_error(&mut self, message: String) {
            self.log.push(message);
        }

        fn show_progress(&mut self, message: &str) {
            self.log.push(format!("progress: {}", message));
        }

        fn hide_progress(&mut self) {
            self.log.push("progress hidden".into());
        }
    }

    #[test]
    fn test_finish_runs_after_success_panics() {
        let callbacks: Callbacks<Screen, u32> =
            Callbacks::new(|_, _| panic!("handler bug"), |_, _| {})
                .on_finish(|s: &mut Screen| s.log.push("finish".into()));
        let (_, completion) = callbacks.into_parts();

        let mut screen = Screen::default();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            completion.deliver(&mut screen, Ok(1));
        }));

        assert!(outcome.is_err());
        assert_eq!(screen.log, vec!["finish".to_string()]);
    }

    #[test]
    fn test_handler_panic_wins_over_finish_panic() {
        let callbacks: Callbacks<Screen, u32> =
            Callbacks::new(|_, _| panic!("first"), |_, _| {}).on_finish(|s: &mut Screen| {
                s.log.push("finish".into());
                panic!("second");
            });
        let (_, completion) = callbacks.into_parts();

        let mut screen = Screen::default();
        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            completion.deliver(&mut screen, Ok(1));
        }))
        .unwrap_err();

        assert_eq!(panic_message(payload.as_ref()), "first");
        assert_eq!(screen.log, vec!["finish".to_string()]);
    }

    #[test]
    fn test_finish_panic_alone_is_resumed() {
        let callbacks: Callbacks<Screen, u32> =
            Callbacks::new(|s: &mut Screen, _| s.log.push("success".into()), |_, _| {})
                .on_finish(|_| panic!("finish bug"));
        let (_, completion) = callbacks.into_parts();

        let mut screen = Screen::default();
        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            completion.deliver(&mut screen, Ok(1));
        }))
        .unwrap_err();

        assert_eq!(panic_message(payload.as_ref()), "finish bug");
        assert_eq!(screen.log, vec!["success".to_string()]);
    }

    #[test]
    fn test_default_error_handler_message() {
        let callbacks: Callbacks<Screen, ()> = Callbacks::with_default_error(|_, _| {});
        let (_, completion) = callbacks.into_parts();

        let mut screen = Screen::default();
        completion.deliver(&mut screen, Err(TaskError::failed("timeout")));
        assert_eq!(
            screen.log,
            vec!["Database operation failed: timeout".to_string()]
        );
    }

    #[test]
    fn test_progress_wraps_hooks() {
        let callbacks: Callbacks<Screen, u32> = Callbacks::new(
            |s: &mut Screen, v| s.log.push(format!("value {}", v)),
            |_, _| {},
        )
        .with_progress("Loading");
        let (start, completion) = callbacks.into_parts();

        let mut screen = Screen::default();
        start.expect("progress installs a start hook")(&mut screen);
        completion.deliver(&mut screen, Ok(3));

        assert_eq!(
            screen.log,
            vec![
                "progress: Loading".to_string(),
                "progress hidden".to_string(),
                "value 3".to_string()
            ]
        );
    }
}
