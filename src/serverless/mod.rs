//! Job data model and runner registration.
//!
//! A worker template calls [`start`] with nothing but its handler callback;
//! everything else (bind address, port, one-shot test input) comes from CLI
//! flags, environment variables, or an optional `PodWorker.toml`.

pub mod job;
pub mod worker;

pub use job::{Job, JobResult, JobStatus};
pub use worker::{build_router, start, Handler};
