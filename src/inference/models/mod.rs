pub mod flan_t5;
pub mod model;
pub mod parler_tts;
pub mod sdxl_turbo;
