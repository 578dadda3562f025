//! Runtime module
//!
//! Provides the background executor and its result handles.

pub mod async_task;
pub mod worker;

pub use async_task::AsyncTask;
pub use worker::{SerialWorker, ShutdownOutcome, SubmitError};
