use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use image::{Rgb, RgbImage};
use tracing::{debug, warn};

use super::{encode, font, Frame, FrameSource};

const FRAME_INTERVAL: Duration = Duration::from_millis(500);
const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const TEXT: &str = "NO CAMERA";
const TEXT_SCALE: u32 = 4;

/// Fallback frame source used when no capture device is reachable
///
/// Renders a static indicator image once and caches it on disk, so later
/// sessions reuse the encoded bytes. Never exhausts.
pub struct PlaceholderSource {
    frame: Frame,
}

impl PlaceholderSource {
    pub fn new(cache_path: PathBuf) -> Self {
        let frame = match fs::read(&cache_path) {
            Ok(bytes) => bytes,
            Err(_) => {
                let bytes = render();
                if let Some(parent) = cache_path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                match fs::write(&cache_path, &bytes) {
                    Ok(_) => debug!("Cached placeholder image at {:?}", cache_path),
                    Err(err) => warn!("Failed caching placeholder at {:?}: {}", cache_path, err),
                }
                bytes
            }
        };
        PlaceholderSource { frame }
    }
}

impl FrameSource for PlaceholderSource {
    fn capture(&mut self) -> Option<Frame> {
        Some(self.frame.clone())
    }

    fn frame_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn is_live(&self) -> bool {
        false
    }
}

fn render() -> Frame {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([18, 26, 34]));
    let x = WIDTH.saturating_sub(font::text_width(TEXT, TEXT_SCALE)) / 2;
    let y = HEIGHT.saturating_sub(font::text_height(TEXT_SCALE)) / 2;
    font::draw_text(&mut img, TEXT, x, y, TEXT_SCALE);
    encode::encode_jpeg(&img).expect("Failed encoding the placeholder image")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_and_cache() {
        let path = std::env::temp_dir().join("hydromon_placeholder_test.jpg");
        let _ = fs::remove_file(&path);

        let mut source = PlaceholderSource::new(path.clone());
        let frame = source.capture().unwrap();
        assert!(frame.starts_with(&[0xFF, 0xD8]));
        assert!(path.exists());

        let decoded = image::load_from_memory(&frame).unwrap();
        assert_eq!((WIDTH, HEIGHT), (decoded.width(), decoded.height()));

        // a second source reuses the cached bytes
        let mut cached = PlaceholderSource::new(path.clone());
        assert_eq!(frame, cached.capture().unwrap());
        assert!(!cached.is_live());

        let _ = fs::remove_file(&path);
    }
}
