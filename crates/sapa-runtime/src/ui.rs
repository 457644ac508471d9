//! Single-threaded UI execution context.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::mpsc;
use tracing::{error, trace};

use crate::error::{panic_message, RunnerError};

/// A unit of work that runs on the UI context with access to the UI state.
pub type UiJob<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

type PanicHandler<S> = Box<dyn FnMut(&mut S, String)>;

/// Create a connected handle/context pair.
///
/// The context stays with the thread that owns the UI state; handles are
/// cloned into anything that needs to post work back to it.
pub fn ui_channel<S>() -> (UiHandle<S>, UiContext<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        UiHandle { tx },
        UiContext {
            rx,
            panic_handler: None,
            executed: 0,
        },
    )
}

/// Sending side of the UI context. Cheap to clone, usable from any thread.
pub struct UiHandle<S> {
    tx: mpsc::UnboundedSender<UiJob<S>>,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> fmt::Debug for UiHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<S> UiHandle<S> {
    /// Queue a job to run on the UI context.
    pub fn post<F>(&self, job: F) -> Result<(), RunnerError>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_| RunnerError::UiClosed)
    }

    /// Returns true once the UI context has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving side: executes posted jobs one at a time against the UI state.
///
/// A job that panics does not take the context down. The panic is logged
/// and handed to the panic handler, if one is installed.
pub struct UiContext<S> {
    rx: mpsc::UnboundedReceiver<UiJob<S>>,
    panic_handler: Option<PanicHandler<S>>,
    executed: u64,
}

impl<S> UiContext<S> {
    /// Install the default handler for panics raised by UI jobs.
    pub fn set_panic_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut S, String) + 'static,
    {
        self.panic_handler = Some(Box::new(handler));
    }

    /// Run every job that is already queued. Never blocks.
    ///
    /// Returns the number of jobs executed.
    pub fn run_pending(&mut self, state: &mut S) -> usize {
        let mut count = 0;
        while let Ok(job) = self.rx.try_recv() {
            self.dispatch(job, state);
            count += 1;
        }
        count
    }

    /// Wait for the next job and run it.
    ///
    /// Returns false once every handle is gone and the queue is empty.
    pub async fn run_next(&mut self, state: &mut S) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                self.dispatch(job, state);
                true
            }
            None => false,
        }
    }

    /// Blocking variant of [`run_next`](Self::run_next) for threads outside
    /// any async runtime.
    pub fn blocking_run_next(&mut self, state: &mut S) -> bool {
        match self.rx.blocking_recv() {
            Some(job) => {
                self.dispatch(job, state);
                true
            }
            None => false,
        }
    }

    /// Total number of jobs executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    fn dispatch(&mut self, job: UiJob<S>, state: &mut S) {
        self.executed += 1;
        trace!(job = self.executed, "Running UI job");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(state)));
        if let Err(payload) = outcome {
            let message = panic_message(payload.as_ref());
            error!(panic = %message, "UI job panicked");
            if let Some(handler) = self.panic_handler.as_mut() {
                handler(state, message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_run_in_post_order() {
        let (handle, mut ctx) = ui_channel::<Vec<u32>>();
        for i in 0..5 {
            handle.post(move |log| log.push(i)).unwrap();
        }

        let mut log = Vec::new();
        assert_eq!(ctx.run_pending(&mut log), 5);
        assert_eq!(log, vec![0, 1, 2, 3, 4]);
        assert_eq!(ctx.run_pending(&mut log), 0);
        assert_eq!(ctx.executed(), 5);
    }

    #[test]
    fn test_panicking_job_reaches_handler() {
        let (handle, mut ctx) = ui_channel::<Vec<String>>();
        ctx.set_panic_handler(|log, msg| log.push(format!("panic: {}", msg)));

        handle.post(|_| panic!("boom")).unwrap();
        handle.post(|log| log.push("after".into())).unwrap();

        let mut log = Vec::new();
        ctx.run_pending(&mut log);
        assert_eq!(log, vec!["panic: boom".to_string(), "after".to_string()]);
    }

    #[test]
    fn test_post_after_context_dropped() {
        let (handle, ctx) = ui_channel::<()>();
        drop(ctx);
        assert!(handle.is_closed());
        assert_eq!(handle.post(|_| {}), Err(RunnerError::UiClosed));
    }

    #[tokio::test]
    async fn test_run_next_stops_when_handles_dropped() {
        let (handle, mut ctx) = ui_channel::<u32>();
        handle.post(|n| *n += 1).unwrap();
        drop(handle);

        let mut n = 0;
        assert!(ctx.run_next(&mut n).await);
        assert!(!ctx.run_next(&mut n).await);
        assert_eq!(n, 1);
    }
}
