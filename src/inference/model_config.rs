use serde::Deserialize;

/// Token sampling knobs shared by the autoregressive pipelines. The
/// defaults are greedy decoding with a mild repeat penalty.
#[derive(Deserialize, Debug, Copy, Clone)]
#[serde(default)]
pub struct SamplingParams {
    pub seed: Option<u64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            seed: None,
            temperature: None,
            top_p: None,
            repeat_penalty: 1.1,
            repeat_last_n: 64,
        }
    }
}

/// Latent diffusion knobs. The defaults mirror the distilled-model starter
/// configuration: a single denoising step at 512x512, guidance-free.
#[derive(Deserialize, Debug, Copy, Clone)]
#[serde(default)]
pub struct ImageParams {
    pub width: usize,
    pub height: usize,
    pub steps: usize,
    pub seed: Option<u64>,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            steps: 1,
            seed: None,
        }
    }
}

/// Audio code generation knobs.
#[derive(Deserialize, Debug, Copy, Clone)]
#[serde(default)]
pub struct AudioParams {
    pub max_steps: usize,
    pub seed: Option<u64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            max_steps: 512,
            seed: None,
            temperature: None,
            top_p: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioParams, ImageParams, SamplingParams};

    #[test]
    fn sampling_defaults_are_greedy() {
        let params = SamplingParams::default();
        assert!(params.temperature.is_none());
        assert!(params.top_p.is_none());
        assert!(params.repeat_penalty > 1.0);
    }

    #[test]
    fn image_defaults_match_the_distilled_model() {
        let params: ImageParams = serde_json::from_str("{}").unwrap();
        assert_eq!((params.width, params.height, params.steps), (512, 512, 1));
    }

    #[test]
    fn partial_params_keep_remaining_defaults() {
        let params: AudioParams = serde_json::from_str(r#"{"max_steps": 128}"#).unwrap();
        assert_eq!(params.max_steps, 128);
        assert!(params.seed.is_none());
    }
}
