//! Starter template for an image generation worker backed by a distilled
//! latent diffusion model. Responses are `data:image/png;base64,` URIs.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use hf_hub::api::sync::Api;
use lazy_static::lazy_static;
use tracing::info;

use pod_worker::inference::models::model::{ImageTask, ModelBase, ModelDomain};
use pod_worker::inference::models::sdxl_turbo::SdxlTurboModel;
use pod_worker::inference::task::text_to_image::{TextToImageHandler, TextToImageRequest};
use pod_worker::serverless::Job;
use pod_worker::{serverless, telemetry};

lazy_static! {
    static ref SDXL_TURBO_MODEL: Mutex<SdxlTurboModel> = Mutex::new(
        SdxlTurboModel::new(
            Api::new().expect("Failed to create API"),
            ModelBase {
                name: "Candle SDXL-Turbo".into(),
                license: "sai-nc-community".into(),
                domain: ModelDomain::Image(vec![ImageTask::Generate]),
                repo_id: "stabilityai/sdxl-turbo".into(),
                repo_revision: "main".into(),
            },
        )
        .unwrap()
    );
}

fn handler(job: Job) -> Result<String> {
    let request: TextToImageRequest = job.parse_input()?;
    let mut model = SDXL_TURBO_MODEL
        .lock()
        .map_err(|_| anyhow!("Model lock poisoned"))?;
    let response = model.run_text_to_image(request)?;
    Ok(response.output)
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry();
    info!("Loading model...");
    lazy_static::initialize(&SDXL_TURBO_MODEL);

    serverless::start(handler).await
}
