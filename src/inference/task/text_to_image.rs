use anyhow::Error;
use serde::{Deserialize, Serialize};

use crate::inference::model_config::ImageParams;

/// Image generation request. Only `prompt` is required; the remaining
/// fields tune the diffusion run.
#[derive(Deserialize, Debug)]
pub struct TextToImageRequest {
    pub prompt: String,

    #[serde(flatten)]
    pub params: ImageParams,
}

/// `output` is a `data:image/png;base64,` URI.
#[derive(Deserialize, Serialize, Debug)]
pub struct TextToImageResponse {
    pub output: String,
    pub inference_time: f64,
}

pub trait TextToImageHandler {
    fn run_text_to_image(
        &mut self,
        request: TextToImageRequest,
    ) -> Result<TextToImageResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::TextToImageRequest;

    #[test]
    fn prompt_is_required() {
        let err = serde_json::from_str::<TextToImageRequest>("{}").unwrap_err();
        assert!(err.to_string().contains("prompt"));
    }

    #[test]
    fn diffusion_params_flatten_from_the_input_mapping() {
        let request: TextToImageRequest =
            serde_json::from_str(r#"{"prompt": "a cat", "steps": 4}"#).unwrap();
        assert_eq!(request.prompt, "a cat");
        assert_eq!(request.params.steps, 4);
        assert_eq!(request.params.width, 512);
    }
}
