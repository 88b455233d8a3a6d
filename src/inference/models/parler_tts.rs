use anyhow::{Error, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use crate::encoding::wav_data_uri;
use crate::inference::audio_pipeline::AudioGenerationPipeline;
use crate::inference::models::model::ModelBase;
use crate::inference::task::text_to_audio::{
    TextToAudioHandler, TextToAudioRequest, TextToAudioResponse,
};

pub struct ParlerTtsModel {
    pub base: ModelBase,
    generator_pipeline: AudioGenerationPipeline,
}

impl ParlerTtsModel {
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
        let generator_pipeline = AudioGenerationPipeline::with_safetensors(
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

impl TextToAudioHandler for ParlerTtsModel {
    #[tracing::instrument(level = "info", skip(self, request))]
    fn run_text_to_audio(
        &mut self,
        request: TextToAudioRequest,
    ) -> Result<TextToAudioResponse, Error> {
        let (pcm, inference_time) = self.generator_pipeline.generate(
            &request.prompt,
            &request.description,
            &request.params,
        )?;

        Ok(TextToAudioResponse {
            output: wav_data_uri(&pcm, self.generator_pipeline.sample_rate())?,
            inference_time,
        })
    }
}
