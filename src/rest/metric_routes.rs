use super::build_response;
use crate::sensor::ConcurrentSensorObserver;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health(observer.clone())
}

/// GET api/health
fn health(
    observer: Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "health"))
        .and_then(|observer: Arc<ConcurrentSensorObserver>| async move {
            let ret = dto::HealthyDto {
                healthy: true,
                database_state: observer.check_db().await,
                reading_count: observer.reading_count().await.unwrap_or(0),
            };
            build_response(Ok(ret))
        })
        .boxed()
}

mod dto {
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub database_state: String,
        pub reading_count: i64,
    }
}
