use std::io::{Cursor, Write};

use anyhow::Result;
use base64ct::{Base64, Encoding};
use byteorder::{LittleEndian, WriteBytesExt};
use image::{DynamicImage, ImageFormat};

/// Encodes an image as an in-memory PNG wrapped in a `data:image/png` URI.
pub fn png_data_uri(image: &DynamicImage) -> Result<String> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        Base64::encode_string(&bytes)
    ))
}

/// Serializes f32 PCM samples as 16-bit mono WAV wrapped in a
/// `data:audio/wav` URI.
pub fn wav_data_uri(samples: &[f32], sample_rate: u32) -> Result<String> {
    let mut bytes = Vec::new();
    write_pcm_as_wav(&mut bytes, samples, sample_rate)?;
    Ok(format!(
        "data:audio/wav;base64,{}",
        Base64::encode_string(&bytes)
    ))
}

// RIFF/WAVE with a single PCM fmt chunk, one channel, 16 bits per sample.
fn write_pcm_as_wav<W: Write>(writer: &mut W, samples: &[f32], sample_rate: u32) -> Result<()> {
    let data_len = u32::try_from(samples.len() * 2)?;

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(36 + data_len)?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(16)?;
    writer.write_u16::<LittleEndian>(1)?; // PCM
    writer.write_u16::<LittleEndian>(1)?; // mono
    writer.write_u32::<LittleEndian>(sample_rate)?;
    writer.write_u32::<LittleEndian>(sample_rate * 2)?;
    writer.write_u16::<LittleEndian>(2)?;
    writer.write_u16::<LittleEndian>(16)?;

    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_len)?;
    for sample in samples {
        let sample = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer.write_i16::<LittleEndian>(sample)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use base64ct::{Base64, Encoding};
    use byteorder::{ByteOrder, LittleEndian};
    use image::{DynamicImage, RgbImage};

    use super::{png_data_uri, wav_data_uri};

    #[test]
    fn png_data_uri_has_prefix_and_magic() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let uri = png_data_uri(&image).unwrap();

        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = Base64::decode_vec(payload).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn wav_data_uri_has_prefix_and_valid_header() {
        let samples = [0.0f32, 0.5, -0.5, 1.0];
        let uri = wav_data_uri(&samples, 24_000).unwrap();

        let payload = uri.strip_prefix("data:audio/wav;base64,").unwrap();
        let bytes = Base64::decode_vec(payload).unwrap();

        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + samples.len() * 2);
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]) as usize, 36 + samples.len() * 2);
        assert_eq!(LittleEndian::read_u32(&bytes[24..28]), 24_000);
        assert_eq!(LittleEndian::read_u32(&bytes[40..44]) as usize, samples.len() * 2);
    }

    #[test]
    fn wav_samples_are_clamped() {
        let uri = wav_data_uri(&[2.0f32, -2.0], 16_000).unwrap();
        let payload = uri.strip_prefix("data:audio/wav;base64,").unwrap();
        let bytes = Base64::decode_vec(payload).unwrap();

        assert_eq!(LittleEndian::read_i16(&bytes[44..46]), 32767);
        assert_eq!(LittleEndian::read_i16(&bytes[46..48]), -32767);
    }
}
