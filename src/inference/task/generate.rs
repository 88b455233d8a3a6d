use anyhow::Error;
use serde::{Deserialize, Serialize};

use crate::inference::model_config::SamplingParams;

fn default_max_length() -> usize {
    512
}

/// Text generation request, deserialized straight from a job's input
/// mapping. Only `text` is required.
#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    pub text: String,

    #[serde(default = "default_max_length")]
    pub max_length: usize,

    #[serde(flatten)]
    pub sampling: SamplingParams,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GenerateResponse {
    pub output: String,
    pub inference_time: f64,
}

pub trait GenerateHandler {
    fn run_generate(&mut self, request: GenerateRequest) -> Result<GenerateResponse, Error>;
}
