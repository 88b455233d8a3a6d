//! Starter template for a text-to-audio worker. Responses are
//! `data:audio/wav;base64,` URIs. Swap `MODEL_REPO` for another
//! text-to-audio checkpoint of the same family at deployment time.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use hf_hub::api::sync::Api;
use lazy_static::lazy_static;
use tracing::info;

use pod_worker::inference::models::model::{AudioTask, ModelBase, ModelDomain};
use pod_worker::inference::models::parler_tts::ParlerTtsModel;
use pod_worker::inference::task::text_to_audio::{TextToAudioHandler, TextToAudioRequest};
use pod_worker::serverless::Job;
use pod_worker::{serverless, telemetry};

const MODEL_REPO: &str = "parler-tts/parler-tts-mini-v1";

lazy_static! {
    static ref AUDIO_MODEL: Mutex<ParlerTtsModel> = Mutex::new(
        ParlerTtsModel::new(
            Api::new().expect("Failed to create API"),
            ModelBase {
                name: "Candle Parler-TTS".into(),
                license: "Apache-2.0".into(),
                domain: ModelDomain::Audio(vec![AudioTask::Generate]),
                repo_id: MODEL_REPO.into(),
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
    let request: TextToAudioRequest = job.parse_input()?;
    let mut model = AUDIO_MODEL
        .lock()
        .map_err(|_| anyhow!("Model lock poisoned"))?;
    let response = model.run_text_to_audio(request)?;
    Ok(response.output)
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry();
    info!("Loading model...");
    lazy_static::initialize(&AUDIO_MODEL);

    serverless::start(handler).await
}
