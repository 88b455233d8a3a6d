//! Serverless worker starter templates for local ML inference.
//!
//! Each worker binary in `src/bin/` is an independent template: it loads one
//! pretrained model at process start, wraps it in a job-handler callback, and
//! registers that callback with [`serverless::start`]. The modules here are
//! the shared plumbing those templates stand on — the job data model and
//! runner loop, [Candle](https://github.com/huggingface/candle)-backed
//! inference pipelines, and the data-URI output encoding.

pub mod config;
pub mod encoding;
pub mod error;
pub mod inference;
pub mod serverless;
pub mod telemetry;
