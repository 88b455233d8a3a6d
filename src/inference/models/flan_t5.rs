use anyhow::{Error, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use crate::inference::models::model::ModelBase;
use crate::inference::task::generate::{GenerateHandler, GenerateRequest, GenerateResponse};
use crate::inference::text_pipeline::TextGenerationPipeline;

pub struct FlanT5Model {
    pub base: ModelBase,
    generator_pipeline: TextGenerationPipeline,
}

impl FlanT5Model {
    #[tracing::instrument(level = "info", skip(api))]
    pub fn new(
        api: Api,
        base: ModelBase,
        config_filename: &str,
        tokenizer_filename: &str,
        weights_filename: &str,
    ) -> Result<Self> {
        let repo = api.repo(Repo::with_revision(
            base.repo_id.clone(),
            RepoType::Model,
            base.repo_revision.clone(),
        ));
        let generator_pipeline = TextGenerationPipeline::with_safetensors(
            &repo,
            config_filename,
            tokenizer_filename,
            weights_filename,
        )?;

        Ok(Self {
            base,
            generator_pipeline,
        })
    }
}

impl GenerateHandler for FlanT5Model {
    #[tracing::instrument(level = "info", skip(self, request))]
    fn run_generate(&mut self, request: GenerateRequest) -> Result<GenerateResponse, Error> {
        let (output, inference_time) = self.generator_pipeline.generate(
            &request.text,
            request.max_length,
            &request.sampling,
        )?;

        Ok(GenerateResponse {
            output,
            inference_time,
        })
    }
}
