use anyhow::{Error, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use crate::encoding::png_data_uri;
use crate::inference::image_pipeline::ImageGenerationPipeline;
use crate::inference::models::model::ModelBase;
use crate::inference::task::text_to_image::{
    TextToImageHandler, TextToImageRequest, TextToImageResponse,
};

pub struct SdxlTurboModel {
    pub base: ModelBase,
    generator_pipeline: ImageGenerationPipeline,
}

impl SdxlTurboModel {
    #[tracing::instrument(level = "info", skip(api))]
    pub fn new(api: Api, base: ModelBase) -> Result<Self> {
        let repo = api.repo(Repo::with_revision(
            base.repo_id.clone(),
            RepoType::Model,
            base.repo_revision.clone(),
        ));
        let tokenizer_repo = api.repo(Repo::with_revision(
            "openai/clip-vit-large-patch14".into(),
            RepoType::Model,
            "main".into(),
        ));
        let tokenizer_2_repo = api.repo(Repo::with_revision(
            "laion/CLIP-ViT-bigG-14-laion2B-39B-b160k".into(),
            RepoType::Model,
            "main".into(),
        ));

        let generator_pipeline = ImageGenerationPipeline::sdxl_turbo(
            &repo,
            tokenizer_repo.get("tokenizer.json")?,
            tokenizer_2_repo.get("tokenizer.json")?,
            "text_encoder/model.safetensors",
            "text_encoder_2/model.safetensors",
            "vae/diffusion_pytorch_model.safetensors",
            "unet/diffusion_pytorch_model.safetensors",
        )?;

        Ok(Self {
            base,
            generator_pipeline,
        })
    }
}

impl TextToImageHandler for SdxlTurboModel {
    #[tracing::instrument(level = "info", skip(self, request))]
    fn run_text_to_image(
        &mut self,
        request: TextToImageRequest,
    ) -> Result<TextToImageResponse, Error> {
        let (image, inference_time) = self
            .generator_pipeline
            .generate(&request.prompt, &request.params)?;

        Ok(TextToImageResponse {
            output: png_data_uri(&image)?,
            inference_time,
        })
    }
}
