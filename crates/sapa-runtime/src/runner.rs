//! Runs tasks on workers and delivers their outcome to the UI context.

use std::future::Future;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use sapa_core::{DataGrid, Row, TableResult};

use crate::callbacks::{
    default_error_handler, Callbacks, Completion, ErrorFn, MessageSurface, TableCallbacks,
};
use crate::error::{BoxError, TaskError};
use crate::table::rebuild;
use crate::task::Task;
use crate::ui::UiHandle;

/// Fire-and-forget task runner bound to one UI context.
///
/// Each call spawns an independent worker unit. Calls are not coordinated
/// with each other: there is no queueing, de-duplication, cancellation or
/// timeout.
pub struct TaskRunner<S> {
    runtime: Handle,
    ui: UiHandle<S>,
}

impl<S> Clone for TaskRunner<S> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            ui: self.ui.clone(),
        }
    }
}

impl<S: 'static> TaskRunner<S> {
    /// Create a runner that spawns on `runtime` and delivers to `ui`.
    pub fn new(runtime: Handle, ui: UiHandle<S>) -> Self {
        Self { runtime, ui }
    }

    /// Run a blocking closure on the blocking pool.
    pub fn run<T, E, F>(&self, task: F, callbacks: Callbacks<S, T>)
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<BoxError>,
        T: Send + 'static,
    {
        self.run_task(Task::blocking(task), callbacks);
    }

    /// Run a future on the async runtime.
    pub fn run_async<T, E, Fut>(&self, fut: Fut, callbacks: Callbacks<S, T>)
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
        T: Send + 'static,
    {
        self.run_task(Task::future(fut), callbacks);
    }

    /// Run a [`Task`].
    ///
    /// With an `on_start` hook, the hook is posted to the UI context first
    /// and the task is handed to a worker only after the hook returned. If
    /// the hook panics the task never starts.
    pub fn run_task<T: Send + 'static>(&self, task: Task<T>, callbacks: Callbacks<S, T>) {
        let (on_start, completion) = callbacks.into_parts();

        match on_start {
            None => self.launch(task, completion),
            Some(start) => {
                let runner = self.clone();
                let posted = self.ui.post(move |state| {
                    start(state);
                    runner.launch(task, completion);
                });
                if posted.is_err() {
                    warn!("UI context closed, task not started");
                }
            }
        }
    }

    /// Run a blocking closure with a progress indicator shown while it runs.
    pub fn run_with_progress<T, E, F>(
        &self,
        task: F,
        callbacks: Callbacks<S, T>,
        message: impl Into<String>,
    ) where
        S: MessageSurface,
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: Into<BoxError>,
        T: Send + 'static,
    {
        self.run(task, callbacks.with_progress(message));
    }

    /// Run a row query and rebuild `grid` with `columns` and the rows.
    ///
    /// On error the grid keeps its previous content; the explicit handler
    /// runs, or the message surface shows a default message.
    pub fn run_for_table(
        &self,
        task: Task<Vec<Row>>,
        grid: fn(&mut S) -> &mut DataGrid,
        columns: Vec<String>,
        hooks: TableCallbacks<S>,
    ) where
        S: MessageSurface,
    {
        let on_success = move |state: &mut S, rows: Vec<Row>| {
            apply_rows(state, grid, columns, rows);
        };
        self.run_task(task, table_callbacks(on_success, hooks));
    }

    /// Like [`run_for_table`](Self::run_for_table), taking the column
    /// labels from the result itself.
    pub fn run_for_table_result(
        &self,
        task: Task<TableResult>,
        grid: fn(&mut S) -> &mut DataGrid,
        hooks: TableCallbacks<S>,
    ) where
        S: MessageSurface,
    {
        let on_success = move |state: &mut S, result: TableResult| {
            let (columns, rows) = result.into_parts();
            apply_rows(state, grid, columns, rows);
        };
        self.run_task(task, table_callbacks(on_success, hooks));
    }

    fn launch<T: Send + 'static>(&self, task: Task<T>, completion: Completion<S, T>) {
        let delivery = Delivery {
            ui: self.ui.clone(),
            completion: Some(completion),
        };
        self.runtime.spawn(async move {
            let outcome = task.execute().await;
            debug!(ok = outcome.is_ok(), "Task finished, delivering to UI");
            delivery.deliver(outcome);
        });
    }
}

/// Posts a task's completion to the UI context exactly once.
///
/// If the worker future is dropped before the outcome is known, as happens
/// when the runtime shuts down, dropping the guard delivers
/// [`TaskError::Interrupted`] instead.
struct Delivery<S: 'static, T: 'static> {
    ui: UiHandle<S>,
    completion: Option<Completion<S, T>>,
}

impl<S: 'static, T: Send + 'static> Delivery<S, T> {
    fn deliver(mut self, outcome: Result<T, TaskError>) {
        let Some(completion) = self.completion.take() else {
            return;
        };
        if self
            .ui
            .post(move |state| completion.deliver(state, outcome))
            .is_err()
        {
            warn!("UI context closed, task outcome dropped");
        }
    }
}

impl<S: 'static, T: 'static> Drop for Delivery<S, T> {
    fn drop(&mut self) {
        let Some(completion) = self.completion.take() else {
            return;
        };
        warn!("Worker dropped before the task completed");
        if self
            .ui
            .post(move |state| completion.deliver(state, Err(TaskError::Interrupted)))
            .is_err()
        {
            warn!("UI context closed, interruption not reported");
        }
    }
}

fn apply_rows<S: MessageSurface>(
    state: &mut S,
    grid: fn(&mut S) -> &mut DataGrid,
    columns: Vec<String>,
    rows: Vec<Row>,
) {
    let count = rows.len();
    match rebuild(grid(state), columns, rows) {
        Ok(()) => debug!(rows = count, "Grid rebuilt"),
        Err(e) => {
            warn!(error = %e, "Query result does not fit the grid");
            state.show_error(format!("Could not display results: {}", e));
        }
    }
}

fn table_callbacks<S, T, OnSuccess>(on_success: OnSuccess, hooks: TableCallbacks<S>) -> Callbacks<S, T>
where
    S: MessageSurface + 'static,
    T: 'static,
    OnSuccess: FnOnce(&mut S, T) + Send + 'static,
{
    let TableCallbacks {
        on_error,
        on_start,
        on_finish,
    } = hooks;

    let on_error: ErrorFn<S> = match on_error {
        Some(handler) => handler,
        None => Box::new(default_error_handler::<S>),
    };

    Callbacks {
        on_start,
        on_success: Box::new(on_success),
        on_error,
        on_finish,
    }
}
