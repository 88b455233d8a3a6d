use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single unit of work submitted to the worker. The runner owns the job's
/// identity and lifecycle; the worker only ever sees one invocation.
#[derive(Deserialize, Debug, Clone)]
pub struct Job {
    #[serde(default = "default_job_id")]
    pub id: String,

    /// Handler-specific input mapping
    pub input: Value,
}

fn default_job_id() -> String {
    "local".to_string()
}

impl Job {
    /// Deserializes the input mapping into a handler request type. A missing
    /// required key fails the job instead of silently defaulting.
    pub fn parse_input<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.input.clone()).context("invalid job input")
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Completed,
    Failed,
}

#[derive(Serialize, Debug, Clone)]
pub struct JobResult {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResult {
    pub fn completed(id: String, output: String) -> Self {
        JobResult {
            id,
            status: JobStatus::Completed,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(id: String, error: String) -> Self {
        JobResult {
            id,
            status: JobStatus::Failed,
            output: None,
            error: Some(error),
        }
    }
}
