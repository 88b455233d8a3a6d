use anyhow::Error;
use serde::{Deserialize, Serialize};

use crate::inference::model_config::AudioParams;

fn default_description() -> String {
    "A female speaker delivers a slightly expressive and animated speech with a moderate \
     speed and pitch. The recording is of very high quality, with the speaker's voice \
     sounding clear and very close up."
        .to_string()
}

/// Audio generation request. Only `prompt` is required; `description`
/// conditions the voice and defaults to a neutral studio recording.
#[derive(Deserialize, Debug)]
pub struct TextToAudioRequest {
    pub prompt: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(flatten)]
    pub params: AudioParams,
}

/// `output` is a `data:audio/wav;base64,` URI.
#[derive(Deserialize, Serialize, Debug)]
pub struct TextToAudioResponse {
    pub output: String,
    pub inference_time: f64,
}

pub trait TextToAudioHandler {
    fn run_text_to_audio(
        &mut self,
        request: TextToAudioRequest,
    ) -> Result<TextToAudioResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::TextToAudioRequest;

    #[test]
    fn prompt_is_required() {
        let err = serde_json::from_str::<TextToAudioRequest>("{}").unwrap_err();
        assert!(err.to_string().contains("prompt"));
    }

    #[test]
    fn description_defaults() {
        let request: TextToAudioRequest =
            serde_json::from_str(r#"{"prompt": "jazz piano"}"#).unwrap();
        assert!(request.description.contains("speaker"));
        assert_eq!(request.params.max_steps, 512);
    }

    #[test]
    fn description_can_be_overridden() {
        let request: TextToAudioRequest =
            serde_json::from_str(r#"{"prompt": "hi", "description": "A deep male voice."}"#)
                .unwrap();
        assert_eq!(request.description, "A deep male voice.");
    }
}
