use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::DBError;

/// Fixed-width ISO-8601 format, so lexicographic order over the stored
/// text column equals chronological order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub water_level: f64,
    pub ph_level: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub tds_level: f64,
    pub dissolved_oxygen: f64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SensorReadingDao {
    pub(crate) id: i64,
    pub(crate) timestamp: String,
    pub(crate) water_level: f64,
    pub(crate) ph_level: f64,
    pub(crate) temperature: f64,
    pub(crate) humidity: f64,
    pub(crate) tds_level: f64,
    pub(crate) dissolved_oxygen: f64,
}

impl SensorReadingDao {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn reading(&self) -> SensorReading {
        SensorReading {
            water_level: self.water_level,
            ph_level: self.ph_level,
            temperature: self.temperature,
            humidity: self.humidity,
            tds_level: self.tds_level,
            dissolved_oxygen: self.dissolved_oxygen,
        }
    }
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub async fn insert(
    conn: &SqlitePool,
    reading: &SensorReading,
    timestamp: NaiveDateTime,
) -> Result<i64, DBError> {
    let result = sqlx::query(
        r#"INSERT INTO sensor_readings
            (timestamp, water_level, ph_level, temperature, humidity, tds_level, dissolved_oxygen)
            VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(format_timestamp(timestamp))
    .bind(reading.water_level)
    .bind(reading.ph_level)
    .bind(reading.temperature)
    .bind(reading.humidity)
    .bind(reading.tds_level)
    .bind(reading.dissolved_oxygen)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_latest(conn: &SqlitePool) -> Result<Option<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(
        "SELECT * FROM sensor_readings ORDER BY timestamp DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await?)
}

pub async fn get_range(
    conn: &SqlitePool,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> Result<Vec<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(
        r#"SELECT * FROM sensor_readings
            WHERE timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp ASC"#,
    )
    .bind(format_timestamp(from))
    .bind(format_timestamp(until))
    .fetch_all(conn)
    .await?)
}

pub async fn get_since(
    conn: &SqlitePool,
    duration: chrono::Duration,
) -> Result<Vec<SensorReadingDao>, DBError> {
    let now = Utc::now().naive_utc();
    get_range(conn, now - duration, now).await
}

pub async fn count(conn: &SqlitePool) -> Result<i64, DBError> {
    let row: (i64,) = sqlx::query_as("SELECT count(*) FROM sensor_readings")
        .fetch_one(conn)
        .await?;
    Ok(row.0)
}
