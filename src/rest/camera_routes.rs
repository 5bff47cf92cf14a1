use hyper::Body;
use tracing::info;
use warp::Filter;

use crate::camera::{self, relay};

pub fn routes() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    webcam_stream().or(video_feed()).or(webcam_socket())
}

/// GET api/webcam/stream
///
/// Long-lived multipart MJPEG response
///
/// Ends silently on consumer disconnect or device loss; without a
/// reachable device the placeholder image is served instead
fn webcam_stream() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::get()
        .and(warp::path!("api" / "webcam" / "stream"))
        .map(stream_reply)
        .boxed()
}

/// GET video_feed
///
/// Legacy alias of api/webcam/stream
fn video_feed() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::get()
        .and(warp::path!("video_feed"))
        .map(stream_reply)
        .boxed()
}

/// WS ws/webcam
///
/// Pushes each encoded frame as a binary message until the consumer
/// disconnects
fn webcam_socket() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("ws" / "webcam")
        .and(warp::ws())
        .map(|ws: warp::ws::Ws| ws.on_upgrade(relay::push_frames))
        .boxed()
}

fn stream_reply() -> warp::http::Response<Body> {
    let source = camera::acquire();
    info!(
        "Starting {} webcam stream",
        if source.is_live() { "device" } else { "placeholder" }
    );

    let body = Body::wrap_stream(relay::mjpeg_stream(source));
    warp::http::Response::builder()
        .header("Content-Type", relay::CONTENT_TYPE)
        .body(body)
        .unwrap()
}
