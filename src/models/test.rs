use chrono::{Duration, NaiveDate, Utc};

use super::reading::{self, SensorReading};
use super::*;

fn mock_reading() -> SensorReading {
    SensorReading {
        water_level: 66.0,
        ph_level: 6.4,
        temperature: 22.5,
        humidity: 70.0,
        tds_level: 900.0,
        dissolved_oxygen: 6.5,
    }
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let conn = establish_test_db().await;
    init_schema(&conn).await.unwrap();
    check_schema(&conn).await.unwrap();
}

#[tokio::test]
async fn test_insert_and_latest() {
    let conn = establish_test_db().await;
    assert!(reading::get_latest(&conn).await.unwrap().is_none());

    let now = Utc::now().naive_utc();
    let first_id = reading::insert(&conn, &mock_reading(), now - Duration::hours(1))
        .await
        .unwrap();
    let second_id = reading::insert(&conn, &mock_reading(), now).await.unwrap();
    assert!(second_id > first_id);
    assert_eq!(2, reading::count(&conn).await.unwrap());

    let latest = reading::get_latest(&conn).await.unwrap().unwrap();
    assert_eq!(second_id, latest.id());
    assert_eq!(reading::format_timestamp(now), latest.timestamp());
    assert_eq!(mock_reading(), latest.reading());
}

#[tokio::test]
async fn test_range_is_inclusive_and_ordered() {
    let conn = establish_test_db().await;
    let base = NaiveDate::from_ymd_opt(2026, 3, 7)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    // insert out of order
    for offset in [2i64, 0, 1] {
        reading::insert(&conn, &mock_reading(), base + Duration::hours(offset))
            .await
            .unwrap();
    }

    let rows = reading::get_range(&conn, base, base + Duration::hours(2))
        .await
        .unwrap();
    assert_eq!(3, rows.len());
    let timestamps: Vec<&str> = rows.iter().map(|dao| dao.timestamp()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(sorted, timestamps);
    assert_eq!(reading::format_timestamp(base), timestamps[0]);
    assert_eq!(
        reading::format_timestamp(base + Duration::hours(2)),
        timestamps[2]
    );
}

#[tokio::test]
async fn test_inverted_range_is_empty() {
    let conn = establish_test_db().await;
    let now = Utc::now().naive_utc();
    reading::insert(&conn, &mock_reading(), now).await.unwrap();

    let rows = reading::get_range(&conn, now, now - Duration::hours(1))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_get_since_filters_old_rows() {
    let conn = establish_test_db().await;
    let now = Utc::now().naive_utc();
    reading::insert(&conn, &mock_reading(), now - Duration::hours(3))
        .await
        .unwrap();
    let recent_id = reading::insert(&conn, &mock_reading(), now - Duration::minutes(30))
        .await
        .unwrap();

    let rows = reading::get_since(&conn, Duration::hours(1)).await.unwrap();
    assert_eq!(1, rows.len());
    assert_eq!(recent_id, rows[0].id());
}
