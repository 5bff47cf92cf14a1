use super::build_response;
use crate::sensor::ConcurrentSensorObserver;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    current_reading(observer.clone())
        .or(reading_history(observer.clone()))
        .or(reading_custom_range(observer.clone()))
        .or(insert_manual_reading(observer.clone()))
        .or(simulate_batch(observer.clone()))
}

/// GET api/sensors/current
///
/// Latest persisted reading with its timestamp
///
/// An empty store answers with a freshly generated reading, or 404
/// when the fallback is disabled by config
fn current_reading(
    observer: Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "sensors" / "current"))
        .and_then(|observer: Arc<ConcurrentSensorObserver>| async move {
            let resp = observer
                .current_reading()
                .await
                .map(|(timestamp, reading)| dto::TimedReadingDto { timestamp, reading });
            build_response(resp)
        })
        .boxed()
}

/// GET api/sensors/history?hours=N
///
/// Readings of the last N hours (default 24), ascending by timestamp
fn reading_history(
    observer: Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "sensors" / "history"))
        .and(warp::query::<dto::HistoryQuery>())
        .and_then(
            |observer: Arc<ConcurrentSensorObserver>, query: dto::HistoryQuery| async move {
                let resp = observer.history(query.hours.unwrap_or(24)).await.map(|rows| {
                    rows.into_iter()
                        .map(dto::ReadingRowDto::from)
                        .collect::<Vec<_>>()
                });
                build_response(resp)
            },
        )
        .boxed()
}

/// GET api/sensors/custom-range?start=ISO&end=ISO
///
/// Readings between two timestamps, inclusive and ascending
///
/// Returns 400 on an unparsable timestamp; an inverted range is empty
fn reading_custom_range(
    observer: Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "sensors" / "custom-range"))
        .and(warp::query::<dto::RangeQuery>())
        .and_then(
            |observer: Arc<ConcurrentSensorObserver>, query: dto::RangeQuery| async move {
                let resp = observer
                    .custom_range(&query.start, &query.end)
                    .await
                    .map(|rows| {
                        rows.into_iter()
                            .map(dto::ReadingRowDto::from)
                            .collect::<Vec<_>>()
                    });
                build_response(resp)
            },
        )
        .boxed()
}

/// POST api/sensors/manual
///
/// Inserts one externally measured reading
///
/// Returns 400 on an unparsable timestamp, 500 on a storage failure
fn insert_manual_reading(
    observer: Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::post())
        .and(warp::path!("api" / "sensors" / "manual"))
        .and(warp::body::json())
        .and_then(
            |observer: Arc<ConcurrentSensorObserver>, body: dto::TimedReadingDto| async move {
                let resp = observer
                    .add_reading(&body.timestamp, &body.reading)
                    .await
                    .map(|_id| dto::CommandResponseDto {
                        status: "success".to_owned(),
                        message: "Data added successfully".to_owned(),
                    });
                build_response(resp)
            },
        )
        .boxed()
}

/// POST api/sensors/simulate-batch?count=100&interval_minutes=15
///
/// Inserts `count` generated readings spaced backward from now
///
/// The response carries the first 5 inserted rows as samples
fn simulate_batch(
    observer: Arc<ConcurrentSensorObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::post())
        .and(warp::path!("api" / "sensors" / "simulate-batch"))
        .and(warp::query::<dto::BatchQuery>())
        .and_then(
            |observer: Arc<ConcurrentSensorObserver>, query: dto::BatchQuery| async move {
                let count = query.count.unwrap_or(100);
                let interval_minutes = query.interval_minutes.unwrap_or(15);
                let resp = observer
                    .simulate_batch(count, interval_minutes)
                    .await
                    .map(|inserted| dto::BatchResponseDto {
                        status: "success".to_owned(),
                        message: format!("Generated {} readings", inserted.len()),
                        samples: inserted
                            .into_iter()
                            .take(5)
                            .map(|(timestamp, reading)| dto::TimedReadingDto { timestamp, reading })
                            .collect(),
                    });
                build_response(resp)
            },
        )
        .boxed()
}

///
/// DTO
///
pub mod dto {
    use crate::models::reading::{SensorReading, SensorReadingDao};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TimedReadingDto {
        pub timestamp: String,
        #[serde(flatten)]
        pub reading: SensorReading,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReadingRowDto {
        pub id: i64,
        pub timestamp: String,
        #[serde(flatten)]
        pub reading: SensorReading,
    }

    impl From<SensorReadingDao> for ReadingRowDto {
        fn from(dao: SensorReadingDao) -> Self {
            ReadingRowDto {
                id: dao.id(),
                timestamp: dao.timestamp().to_owned(),
                reading: dao.reading(),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct HistoryQuery {
        pub hours: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RangeQuery {
        pub start: String,
        pub end: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct BatchQuery {
        pub count: Option<i64>,
        pub interval_minutes: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommandResponseDto {
        pub status: String,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchResponseDto {
        pub status: String,
        pub message: String,
        pub samples: Vec<TimedReadingDto>,
    }
}
