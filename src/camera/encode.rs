use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use super::{font, Frame};
use crate::error::StreamError;

const JPEG_QUALITY: u8 = 80;
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const STAMP_SCALE: u32 = 2;
const STAMP_MARGIN: u32 = 8;

/// Overlays the current wall-clock time and re-encodes at fixed quality
pub fn annotate(raw: &[u8]) -> Result<Frame, StreamError> {
    let mut img = image::load_from_memory(raw)?.to_rgb8();
    let stamp = Utc::now().format(STAMP_FORMAT).to_string();
    font::draw_text(&mut img, &stamp, STAMP_MARGIN, STAMP_MARGIN, STAMP_SCALE);
    encode_jpeg(&img)
}

pub fn encode_jpeg(img: &RgbImage) -> Result<Frame, StreamError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder)?;
    Ok(buf)
}

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_annotate_roundtrip() {
        let img = RgbImage::from_pixel(160, 120, Rgb([10, 80, 10]));
        let encoded = encode_jpeg(&img).unwrap();
        assert!(encoded.starts_with(&[0xFF, 0xD8]));

        let annotated = annotate(&encoded).unwrap();
        assert!(annotated.starts_with(&[0xFF, 0xD8]));
        let decoded = image::load_from_memory(&annotated).unwrap();
        assert_eq!((160, 120), (decoded.width(), decoded.height()));
    }

    #[test]
    fn test_annotate_rejects_garbage() {
        assert!(annotate(&[0, 1, 2, 3]).is_err());
    }
}
