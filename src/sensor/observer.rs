use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::generator;
use crate::config::CONFIG;
use crate::error::{ApiError, ObserverError};
use crate::models::{
    self,
    reading::{self, SensorReading, SensorReadingDao},
};

/// Central handle over the reading store
///
/// Every operation is a single self-contained statement on a pooled
/// connection, so concurrent readers and writers need no further
/// coordination here.
pub struct ConcurrentSensorObserver {
    db_conn: SqlitePool,
}

impl ConcurrentSensorObserver {
    pub fn new(db_conn: SqlitePool) -> Arc<Self> {
        Arc::new(ConcurrentSensorObserver { db_conn })
    }

    /// Latest persisted reading
    ///
    /// An empty store answers with a freshly generated reading stamped now,
    /// unless the fallback is disabled by config
    pub async fn current_reading(&self) -> Result<(String, SensorReading), ObserverError> {
        match reading::get_latest(&self.db_conn).await? {
            Some(dao) => Ok((dao.timestamp().to_owned(), dao.reading())),
            None if CONFIG.fallback_on_empty() => {
                debug!("Empty store, answering with a generated reading");
                let now = Utc::now().naive_utc();
                Ok((reading::format_timestamp(now), generator::generate()))
            }
            None => Err(ApiError::NoData.into()),
        }
    }

    /// Readings of the last `hours` hours, ascending
    pub async fn history(&self, hours: i64) -> Result<Vec<SensorReadingDao>, ObserverError> {
        let rows = reading::get_since(&self.db_conn, Duration::hours(hours.max(0))).await?;
        Ok(rows)
    }

    /// Readings between two client-supplied timestamps, ascending
    ///
    /// An inverted range is empty, not an error
    pub async fn custom_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<SensorReadingDao>, ObserverError> {
        let from = parse_timestamp(start)?;
        let until = parse_timestamp(end)?;
        let rows = reading::get_range(&self.db_conn, from, until).await?;
        Ok(rows)
    }

    pub async fn add_reading(
        &self,
        timestamp: &str,
        values: &SensorReading,
    ) -> Result<i64, ObserverError> {
        let timestamp = parse_timestamp(timestamp)?;
        let id = reading::insert(&self.db_conn, values, timestamp).await?;
        debug!("Inserted manual reading {}", id);
        Ok(id)
    }

    /// Inserts `count` generated readings spaced `interval_minutes` apart,
    /// counting backward from now
    pub async fn simulate_batch(
        &self,
        count: i64,
        interval_minutes: i64,
    ) -> Result<Vec<(String, SensorReading)>, ObserverError> {
        let now = Utc::now().naive_utc();
        let mut inserted = Vec::with_capacity(count.max(0) as usize);
        for i in 0..count.max(0) {
            let timestamp = now - Duration::minutes(interval_minutes * i);
            let generated = generator::generate();
            reading::insert(&self.db_conn, &generated, timestamp).await?;
            inserted.push((reading::format_timestamp(timestamp), generated));
        }
        info!("Generated {} readings", inserted.len());
        Ok(inserted)
    }

    pub async fn reading_count(&self) -> Result<i64, ObserverError> {
        Ok(reading::count(&self.db_conn).await?)
    }

    pub async fn check_db(&self) -> String {
        match models::check_schema(&self.db_conn).await {
            Ok(_) => "connected".to_owned(),
            Err(err) => format!("error: {}", err),
        }
    }
}

/// Naive ISO-8601, or RFC-3339 with an offset normalized to UTC
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ApiError> {
    if let Ok(parsed) = value.parse::<NaiveDateTime>() {
        return Ok(parsed);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.naive_utc())
        .map_err(|_| ApiError::InvalidTimestamp(value.to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_naive_timestamp() {
        let parsed = parse_timestamp("2026-03-07T12:30:00").unwrap();
        assert_eq!("2026-03-07T12:30:00.000000", reading::format_timestamp(parsed));
    }

    #[test]
    fn test_parse_offset_timestamp_normalizes_to_utc() {
        let parsed = parse_timestamp("2026-03-07T12:30:00+04:00").unwrap();
        assert_eq!("2026-03-07T08:30:00.000000", reading::format_timestamp(parsed));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
