use std::time::Duration;

use crate::config::CONFIG;

#[cfg(target_os = "linux")]
pub mod device;
pub mod encode;
mod font;
pub mod placeholder;
pub mod relay;

/// One encoded JPEG capture
pub type Frame = Vec<u8>;

/// Polymorphic frame producer, one instance per stream session
pub trait FrameSource: Send {
    /// Next frame, or `None` once the source is exhausted
    fn capture(&mut self) -> Option<Frame>;

    /// Minimum delay between two consecutive frames
    fn frame_interval(&self) -> Duration;

    /// Whether frames come from a physical capture device
    fn is_live(&self) -> bool;
}

/// Tries the configured device indices, falls back to the placeholder
pub fn acquire() -> Box<dyn FrameSource> {
    #[cfg(target_os = "linux")]
    match device::DeviceSource::open(&CONFIG.device_indices()) {
        Ok(source) => return Box::new(source),
        Err(err) => tracing::debug!("No capture device: {}", err),
    }

    Box::new(placeholder::PlaceholderSource::new(
        CONFIG.placeholder_path().into(),
    ))
}
