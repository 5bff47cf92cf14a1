use std::convert::Infallible;
use std::sync::Arc;

use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::Filter;

use crate::config::CONFIG;
use crate::error::ObserverError;
use crate::sensor::ConcurrentSensorObserver;

mod camera_routes;
mod metric_routes;
mod sensor_routes;

pub(crate) fn build_response<T: serde::Serialize>(
    resp: Result<T, ObserverError>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, warp::Rejection> {
    let (reply, status) = match resp {
        Ok(data) => (warp::reply::json(&data), StatusCode::OK),
        Err(ObserverError::User(err)) => {
            warn!("{}", err);
            (
                warp::reply::json(&dto::ErrorResponseDto {
                    error: format!("{}", err),
                }),
                StatusCode::BAD_REQUEST,
            )
        }
        Err(ObserverError::NotFound(err)) => {
            warn!("{}", err);
            (
                warp::reply::json(&dto::ErrorResponseDto {
                    error: format!("{}", err),
                }),
                StatusCode::NOT_FOUND,
            )
        }
        Err(ObserverError::Internal(err)) => {
            error!("{}", err);
            (
                warp::reply::json(&dto::ErrorResponseDto {
                    error: format!("{}", err),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    };
    Ok(warp::reply::with_status(reply, status))
}

pub(crate) async fn handle_rejection(
    err: warp::Rejection,
) -> Result<impl warp::Reply, Infallible> {
    let (message, status) = if err.is_not_found() {
        ("Not Found".to_owned(), StatusCode::NOT_FOUND)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (format!("{}", e), StatusCode::BAD_REQUEST)
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (format!("{}", e), StatusCode::BAD_REQUEST)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ("Method Not Allowed".to_owned(), StatusCode::METHOD_NOT_ALLOWED)
    } else {
        error!("Unhandled rejection: {:?}", err);
        ("Internal error".to_owned(), StatusCode::INTERNAL_SERVER_ERROR)
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&dto::ErrorResponseDto { error: message }),
        status,
    ))
}

pub async fn dispatch_server(observer: Arc<ConcurrentSensorObserver>) {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    let routes = sensor_routes::routes(&observer)
        .or(metric_routes::routes(&observer))
        .or(camera_routes::routes())
        .recover(handle_rejection)
        .with(cors);

    let port = CONFIG.server_port();
    info!("Starting webserver at: 0.0.0.0:{}", port);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}

///
/// DTO
///
pub mod dto {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponseDto {
        pub error: String,
    }
}
