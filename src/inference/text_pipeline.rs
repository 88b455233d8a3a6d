use anyhow::{bail, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use hf_hub::api::sync::ApiRepo;
use rand::random;
use tokenizers::Tokenizer;

use crate::inference::model_config::SamplingParams;

// Decode loop shaped on
// https://github.com/huggingface/candle/blob/main/candle-examples/examples/t5/main.rs
pub struct TextGenerationPipeline {
    model: t5::T5ForConditionalGeneration,
    config: t5::Config,
    device: Device,
    tokenizer: Tokenizer,
}

impl TextGenerationPipeline {
    pub fn with_safetensors(
        repo: &ApiRepo,
        config_filename: &str,
        tokenizer_filename: &str,
        weights_filename: &str,
    ) -> Result<TextGenerationPipeline> {
        let config_file = repo.get(config_filename)?;
        let tokenizer_file = repo.get(tokenizer_filename)?;
        let weights_file = repo.get(weights_filename)?;

        let config: t5::Config = serde_json::from_str(&std::fs::read_to_string(config_file)?)?;
        let tokenizer = Tokenizer::from_file(tokenizer_file).map_err(anyhow::Error::msg)?;

        let device = Device::Cpu;
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_file], DType::F32, &device)? };
        let model = t5::T5ForConditionalGeneration::load(vb, &config)?;

        Ok(TextGenerationPipeline {
            model,
            config,
            device,
            tokenizer,
        })
    }

    /// Runs conditional generation on `prompt` and returns the decoded text
    /// together with the elapsed inference time in seconds.
    pub fn generate(
        &mut self,
        prompt: &str,
        max_length: usize,
        params: &SamplingParams,
    ) -> Result<(String, f64)> {
        self.model.clear_kv_cache();

        let tokens = self
            .tokenizer
            .encode(prompt, true)
            .map_err(anyhow::Error::msg)?
            .get_ids()
            .to_vec();
        if tokens.is_empty() {
            bail!("Prompt is empty");
        }
        let input_token_ids = Tensor::new(tokens.as_slice(), &self.device)?.unsqueeze(0)?;

        let mut logits_processor = LogitsProcessor::new(
            params.seed.unwrap_or_else(random),
            params.temperature,
            params.top_p,
        );
        let mut output_token_ids = [self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32]
        .to_vec();

        let start_gen = std::time::Instant::now();
        let encoder_output = self.model.encode(&input_token_ids)?;

        for index in 0..max_length {
            let decoder_token_ids = if index == 0 || !self.config.use_cache {
                Tensor::new(output_token_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last_token = match output_token_ids.last() {
                    Some(token) => *token,
                    None => bail!("Decoder token buffer is empty"),
                };
                Tensor::new(&[last_token], &self.device)?.unsqueeze(0)?
            };

            let logits = self
                .model
                .decode(&decoder_token_ids, &encoder_output)?
                .squeeze(0)?;
            let logits = if (params.repeat_penalty - 1.).abs() < f32::EPSILON {
                logits
            } else {
                let start_at = output_token_ids.len().saturating_sub(params.repeat_last_n);
                candle_transformers::utils::apply_repeat_penalty(
                    &logits,
                    params.repeat_penalty,
                    &output_token_ids[start_at..],
                )?
            };

            let next_token = logits_processor.sample(&logits)?;
            if next_token as usize == self.config.eos_token_id {
                break;
            }
            output_token_ids.push(next_token);
        }

        let output = self
            .tokenizer
            .decode(&output_token_ids, true)
            .map_err(anyhow::Error::msg)?;

        Ok((output, start_gen.elapsed().as_secs_f64()))
    }
}
