use std::sync::mpsc::{Receiver, SyncSender, TrySendError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use super::{Frame, FrameSource};
use crate::error::StreamError;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const BUFFER_COUNT: u32 = 4;

/// Camera-backed frame source
///
/// The V4L stream runs on a dedicated thread, as the mmap'ed capture
/// buffers borrow the device handle. Frames arrive through a bounded
/// channel and are dropped while the consumer lags. Dropping the source
/// disconnects the channel, which unblocks the thread on its next send
/// and closes the device on every exit path.
pub struct DeviceSource {
    rx: Receiver<Frame>,
}

impl DeviceSource {
    /// Opens the first index that yields a capture device
    pub fn open(indices: &[usize]) -> Result<Self, StreamError> {
        let dev = indices
            .iter()
            .find_map(|&index| match Device::new(index) {
                Ok(dev) => Some(dev),
                Err(err) => {
                    debug!("Capture device {} not available: {}", index, err);
                    None
                }
            })
            .ok_or(StreamError::DeviceUnavailable)?;

        let mut fmt = dev.format()?;
        fmt.fourcc = FourCC::new(b"MJPG");
        dev.set_format(&fmt)?;

        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        thread::spawn(move || capture_loop(dev, tx));
        Ok(DeviceSource { rx })
    }
}

impl FrameSource for DeviceSource {
    /// `None` once the device read fails and the capture thread is gone
    fn capture(&mut self) -> Option<Frame> {
        self.rx.recv().ok()
    }

    fn frame_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn is_live(&self) -> bool {
        true
    }
}

fn capture_loop(dev: Device, tx: SyncSender<Frame>) {
    let mut stream = match MmapStream::with_buffers(&dev, Type::VideoCapture, BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(err) => {
            warn!("Failed mapping capture buffers: {}", err);
            return;
        }
    };

    loop {
        match stream.next() {
            Ok((buf, meta)) => {
                let used = (meta.bytesused as usize).min(buf.len());
                match tx.try_send(buf[..used].to_vec()) {
                    Err(TrySendError::Disconnected(_)) => break,
                    // consumer still busy with the last frame, drop this one
                    Err(TrySendError::Full(_)) => {}
                    Ok(()) => {}
                }
            }
            Err(err) => {
                warn!("Device read failed: {}", err);
                break;
            }
        }
    }
}
