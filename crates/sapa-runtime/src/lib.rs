//! Background task runner for the SAPA admin console.
//!
//! Blocking database work must never run on the UI thread, and UI state must
//! never be touched from a worker. This crate joins the two sides:
//!
//! - [`UiContext`] is an explicit single-threaded execution context. The
//!   event loop owns it and drains its queue of jobs against `&mut S`, the
//!   UI state.
//! - [`TaskRunner`] runs a [`Task`] on a worker and posts the lifecycle
//!   [`Callbacks`] back to the UI context in a fixed order:
//!   `on_start` → task → `on_success` | `on_error` → `on_finish`.
//! - [`populate`] and [`TaskRunner::run_for_table`] adapt query results to
//!   on-screen grids.
//!
//! There is no cancellation, timeout, retry or de-duplication. Two refreshes
//! of the same grid may complete in either order; the last one wins.

pub mod callbacks;
pub mod error;
pub mod runner;
pub mod table;
pub mod task;
pub mod ui;

pub use callbacks::{default_error_handler, Callbacks, MessageSurface, TableCallbacks};
pub use error::{BoxError, RunnerError, TaskError};
pub use runner::TaskRunner;
pub use table::{populate, populate_or_placeholder, rebuild};
pub use task::Task;
pub use ui::{ui_channel, UiContext, UiHandle, UiJob};
