//! Starter template for a text generation worker backed by a T5 model.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use hf_hub::api::sync::Api;
use lazy_static::lazy_static;
use tracing::info;

use pod_worker::inference::models::flan_t5::FlanT5Model;
use pod_worker::inference::models::model::{ModelBase, ModelDomain, TextTask};
use pod_worker::inference::task::generate::{GenerateHandler, GenerateRequest};
use pod_worker::serverless::Job;
use pod_worker::{serverless, telemetry};

lazy_static! {
    static ref FLAN_T5_MODEL: Mutex<FlanT5Model> = Mutex::new(
        FlanT5Model::new(
            Api::new().expect("Failed to create API"),
            ModelBase {
                name: "Candle Flan-T5".into(),
                license: "Apache-2.0".into(),
                domain: ModelDomain::Text(vec![
                    TextTask::Generate,
                    TextTask::Translate,
                    TextTask::Summarize,
                ]),
                repo_id: "google/flan-t5-base".into(),
                repo_revision: "main".into(),
            },
            "config.json",
            "tokenizer.json",
            "model.safetensors",
        )
        .unwrap()
    );
}

fn handler(job: Job) -> Result<String> {
    let request: GenerateRequest = job.parse_input()?;
    let mut model = FLAN_T5_MODEL
        .lock()
        .map_err(|_| anyhow!("Model lock poisoned"))?;
    let response = model.run_generate(request)?;
    Ok(response.output)
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry();
    info!("Loading model...");
    lazy_static::initialize(&FLAN_T5_MODEL);

    serverless::start(handler).await
}
