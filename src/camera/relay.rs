use std::convert::Infallible;

use futures_util::stream::{self, Stream};
use futures_util::{SinkExt, StreamExt};
use tracing::debug;
use warp::ws::{Message, WebSocket};

use super::{encode, FrameSource};

pub const BOUNDARY: &str = "frame";
pub const CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Lazy multipart body over one frame source
///
/// Ends when the source is exhausted. A disconnecting consumer drops the
/// stream, which releases the source. Frames that fail to encode are
/// skipped, the session continues with the next capture.
pub fn mjpeg_stream(
    source: Box<dyn FrameSource>,
) -> impl Stream<Item = Result<Vec<u8>, Infallible>> + Send {
    stream::unfold(source, |mut source| async move {
        loop {
            let interval = source.frame_interval();
            let (raw, returned) = match tokio::task::spawn_blocking(move || {
                let raw = source.capture();
                (raw, source)
            })
            .await
            {
                Ok(pair) => pair,
                Err(_) => return None,
            };
            source = returned;

            let raw = raw?;
            match encode::annotate(&raw) {
                Ok(frame) => {
                    tokio::time::sleep(interval).await;
                    return Some((Ok::<_, Infallible>(wrap_part(&frame)), source));
                }
                Err(err) => debug!("Skipping frame: {}", err),
            }
        }
    })
}

/// Socket delivery sharing the capture loop semantics
///
/// Acquires its own source per connection; with no device reachable the
/// placeholder keeps the connection alive at a slower interval.
pub async fn push_frames(ws: WebSocket) {
    let mut source = super::acquire();
    let (mut tx, mut rx) = ws.split();

    // drain the client side so close frames and pings get processed
    tokio::task::spawn(async move { while let Some(Ok(_)) = rx.next().await {} });

    loop {
        let interval = source.frame_interval();
        let (raw, returned) = match tokio::task::spawn_blocking(move || {
            let raw = source.capture();
            (raw, source)
        })
        .await
        {
            Ok(pair) => pair,
            Err(_) => break,
        };
        source = returned;

        let raw = match raw {
            Some(raw) => raw,
            None => break,
        };
        match encode::annotate(&raw) {
            Ok(frame) => {
                if tx.send(Message::binary(frame)).await.is_err() {
                    debug!("Stream consumer disconnected");
                    break;
                }
                tokio::time::sleep(interval).await;
            }
            Err(err) => debug!("Skipping frame: {}", err),
        }
    }
    let _ = tx.close().await;
}

fn wrap_part(frame: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        BOUNDARY,
        frame.len()
    )
    .into_bytes();
    part.extend_from_slice(frame);
    part.extend_from_slice(b"\r\n");
    part
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use image::{Rgb, RgbImage};
    use tokio::time::timeout;

    use super::super::placeholder::PlaceholderSource;
    use super::super::Frame;
    use super::*;

    struct StaticSource {
        frames: Vec<Frame>,
    }

    impl FrameSource for StaticSource {
        fn capture(&mut self) -> Option<Frame> {
            if self.frames.is_empty() {
                None
            } else {
                Some(self.frames.remove(0))
            }
        }

        fn frame_interval(&self) -> Duration {
            Duration::from_millis(1)
        }

        fn is_live(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_mjpeg_stream_parts_and_termination() {
        let good = encode::encode_jpeg(&RgbImage::from_pixel(64, 48, Rgb([0, 128, 0]))).unwrap();
        // first frame is garbage and must be skipped, not terminate the stream
        let source = Box::new(StaticSource {
            frames: vec![vec![0, 1, 2, 3], good.clone(), good],
        });
        let mut stream = Box::pin(mjpeg_stream(source));

        let first = stream.next().await.unwrap().unwrap();
        assert!(first.starts_with(b"--frame\r\nContent-Type: image/jpeg\r\n"));
        assert!(first.ends_with(b"\r\n"));

        let second = stream.next().await.unwrap().unwrap();
        assert!(second.starts_with(b"--frame\r\n"));

        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_mjpeg_stream_placeholder_is_bounded() {
        let path = std::env::temp_dir().join("hydromon_relay_placeholder_test.jpg");
        let source = Box::new(PlaceholderSource::new(path.clone()));
        let mut stream = Box::pin(mjpeg_stream(source));

        let part = timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("placeholder frame within a bounded interval")
            .unwrap()
            .unwrap();
        assert!(part.starts_with(b"--frame\r\n"));

        let _ = std::fs::remove_file(&path);
    }
}
