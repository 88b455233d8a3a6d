use anyhow::{bail, Result};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::parler_tts;
use hf_hub::api::sync::ApiRepo;
use rand::random;
use tokenizers::Tokenizer;

use crate::inference::model_config::AudioParams;

// Generation flow shaped on
// https://github.com/huggingface/candle/blob/main/candle-examples/examples/parler-tts/main.rs
pub struct AudioGenerationPipeline {
    model: parler_tts::Model,
    device: Device,
    tokenizer: Tokenizer,
    sample_rate: u32,
}

impl AudioGenerationPipeline {
    pub fn with_safetensors(
        repo: &ApiRepo,
        config_filename: &str,
        tokenizer_filename: &str,
        weights_filename: &str,
    ) -> Result<AudioGenerationPipeline> {
        let config_file = repo.get(config_filename)?;
        let tokenizer_file = repo.get(tokenizer_filename)?;
        let weights_file = repo.get(weights_filename)?;

        let config: parler_tts::Config =
            serde_json::from_str(&std::fs::read_to_string(config_file)?)?;
        let tokenizer = Tokenizer::from_file(tokenizer_file).map_err(anyhow::Error::msg)?;

        let device = Device::Cpu;
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_file], DType::F32, &device)? };
        let sample_rate = u32::try_from(config.audio_encoder.sampling_rate)?;
        let model = parler_tts::Model::new(&config, vb)?;

        Ok(AudioGenerationPipeline {
            model,
            device,
            tokenizer,
            sample_rate,
        })
    }

    /// Sample rate of the generated PCM, fixed by the audio codec.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Generates audio codes for `prompt` conditioned on the voice
    /// `description`, decodes them to f32 PCM, and returns the samples
    /// together with the elapsed inference time in seconds.
    pub fn generate(
        &mut self,
        prompt: &str,
        description: &str,
        params: &AudioParams,
    ) -> Result<(Vec<f32>, f64)> {
        if prompt.is_empty() {
            bail!("Prompt is empty");
        }

        let prompt_tokens = self.encode(prompt)?;
        let description_tokens = self.encode(description)?;
        let logits_processor = LogitsProcessor::new(
            params.seed.unwrap_or_else(random),
            params.temperature,
            params.top_p,
        );

        let start_gen = std::time::Instant::now();
        let codes = self.model.generate(
            &prompt_tokens,
            &description_tokens,
            logits_processor,
            params.max_steps,
        )?;
        let codes = codes.to_dtype(DType::I64)?.unsqueeze(0)?;

        let pcm = self
            .model
            .audio_encoder
            .decode_codes(&codes.to_device(&self.device)?)?;
        let pcm = pcm.i((0, 0))?.to_vec1::<f32>()?;

        Ok((pcm, start_gen.elapsed().as_secs_f64()))
    }

    fn encode(&self, text: &str) -> Result<Tensor> {
        let tokens = self
            .tokenizer
            .encode(text, true)
            .map_err(anyhow::Error::msg)?
            .get_ids()
            .to_vec();
        Ok(Tensor::new(tokens.as_slice(), &self.device)?.unsqueeze(0)?)
    }
}
