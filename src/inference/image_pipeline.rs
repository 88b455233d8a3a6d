use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use candle_core::{DType, Device, IndexOp, Module, Tensor, D};
use candle_transformers::models::stable_diffusion;
use candle_transformers::models::stable_diffusion::clip::ClipTextTransformer;
use candle_transformers::models::stable_diffusion::unet_2d::UNet2DConditionModel;
use candle_transformers::models::stable_diffusion::vae::AutoEncoderKL;
use candle_transformers::models::stable_diffusion::StableDiffusionConfig;
use hf_hub::api::sync::ApiRepo;
use image::{DynamicImage, RgbImage};
use tokenizers::Tokenizer;

use crate::inference::model_config::ImageParams;

// SDXL latent scaling factor
const VAE_SCALE: f64 = 0.13025;

// Denoising loop shaped on
// https://github.com/huggingface/candle/blob/main/candle-examples/examples/stable-diffusion/main.rs
pub struct ImageGenerationPipeline {
    config: StableDiffusionConfig,
    tokenizer: Tokenizer,
    tokenizer_2: Tokenizer,
    text_model: ClipTextTransformer,
    text_model_2: ClipTextTransformer,
    vae: AutoEncoderKL,
    unet: UNet2DConditionModel,
    device: Device,
    dtype: DType,
}

impl ImageGenerationPipeline {
    /// Loads the distilled SDXL-Turbo weights. The two CLIP tokenizer files
    /// live in their own repositories and are resolved by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn sdxl_turbo(
        repo: &ApiRepo,
        tokenizer_file: PathBuf,
        tokenizer_2_file: PathBuf,
        clip_filename: &str,
        clip2_filename: &str,
        vae_filename: &str,
        unet_filename: &str,
    ) -> Result<ImageGenerationPipeline> {
        let device = Device::Cpu;
        let dtype = DType::F32;
        let config = StableDiffusionConfig::sdxl_turbo(None, None, None);

        let tokenizer = Tokenizer::from_file(tokenizer_file).map_err(anyhow::Error::msg)?;
        let tokenizer_2 = Tokenizer::from_file(tokenizer_2_file).map_err(anyhow::Error::msg)?;

        let text_model = stable_diffusion::build_clip_transformer(
            &config.clip,
            repo.get(clip_filename)?,
            &device,
            dtype,
        )?;
        let clip2_config = config
            .clip2
            .as_ref()
            .context("Model config has no second text encoder")?;
        let text_model_2 = stable_diffusion::build_clip_transformer(
            clip2_config,
            repo.get(clip2_filename)?,
            &device,
            dtype,
        )?;

        let vae = config.build_vae(repo.get(vae_filename)?, &device, dtype)?;
        let unet = config.build_unet(repo.get(unet_filename)?, &device, 4, false, dtype)?;

        Ok(ImageGenerationPipeline {
            config,
            tokenizer,
            tokenizer_2,
            text_model,
            text_model_2,
            vae,
            unet,
            device,
            dtype,
        })
    }

    /// Runs the guidance-free denoising loop and returns the decoded image
    /// together with the elapsed inference time in seconds.
    pub fn generate(&self, prompt: &str, params: &ImageParams) -> Result<(DynamicImage, f64)> {
        if params.height % 8 != 0 || params.width % 8 != 0 {
            bail!("Image dimensions must be multiples of 8");
        }
        if let Some(seed) = params.seed {
            self.device.set_seed(seed)?;
        }

        let start_gen = std::time::Instant::now();
        let embeddings = Tensor::cat(
            &[
                self.encode_prompt(prompt, &self.tokenizer, &self.text_model, &self.config.clip)?,
                self.encode_prompt(
                    prompt,
                    &self.tokenizer_2,
                    &self.text_model_2,
                    self.config
                        .clip2
                        .as_ref()
                        .context("Model config has no second text encoder")?,
                )?,
            ],
            D::Minus1,
        )?
        .to_dtype(self.dtype)?;

        let mut scheduler = self.config.build_scheduler(params.steps)?;
        let timesteps = scheduler.timesteps().to_vec();

        let latents = Tensor::randn(
            0f32,
            1f32,
            (1, 4, params.height / 8, params.width / 8),
            &self.device,
        )?;
        let mut latents = ((latents * scheduler.init_noise_sigma())?).to_dtype(self.dtype)?;

        for &timestep in &timesteps {
            let latent_model_input = scheduler.scale_model_input(latents.clone(), timestep)?;
            let noise_pred = self
                .unet
                .forward(&latent_model_input, timestep as f64, &embeddings)?;
            latents = scheduler.step(&noise_pred, timestep, &latents)?;
        }

        let image = self.vae.decode(&(&latents / VAE_SCALE)?)?;
        let image = ((image / 2.)? + 0.5)?.to_device(&Device::Cpu)?;
        let image = (image.clamp(0f32, 1.)? * 255.)?.to_dtype(DType::U8)?.i(0)?;

        Ok((to_image(&image)?, start_gen.elapsed().as_secs_f64()))
    }

    fn encode_prompt(
        &self,
        prompt: &str,
        tokenizer: &Tokenizer,
        text_model: &ClipTextTransformer,
        clip_config: &stable_diffusion::clip::Config,
    ) -> Result<Tensor> {
        let pad_token = match &clip_config.pad_with {
            Some(padding) => padding.as_str(),
            None => "<|endoftext|>",
        };
        let pad_id = match tokenizer.get_vocab(true).get(pad_token) {
            Some(id) => *id,
            None => bail!("Cannot find the {pad_token} token"),
        };

        let mut tokens = tokenizer
            .encode(prompt, true)
            .map_err(anyhow::Error::msg)?
            .get_ids()
            .to_vec();
        if tokens.len() > clip_config.max_position_embeddings {
            bail!(
                "Prompt is too long ({} tokens, limit {})",
                tokens.len(),
                clip_config.max_position_embeddings
            );
        }
        while tokens.len() < clip_config.max_position_embeddings {
            tokens.push(pad_id);
        }

        let tokens = Tensor::new(tokens.as_slice(), &self.device)?.unsqueeze(0)?;
        Ok(text_model.forward(&tokens)?)
    }
}

fn to_image(tensor: &Tensor) -> Result<DynamicImage> {
    let (channels, height, width) = tensor.dims3()?;
    if channels != 3 {
        bail!("Expected an RGB tensor, got {channels} channels");
    }
    let pixels = tensor.permute((1, 2, 0))?.flatten_all()?.to_vec1::<u8>()?;
    let image = RgbImage::from_raw(width as u32, height as u32, pixels)
        .context("Decoded image buffer has the wrong size")?;
    Ok(DynamicImage::ImageRgb8(image))
}
