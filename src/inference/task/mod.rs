pub mod generate;
pub mod text_to_audio;
pub mod text_to_image;
