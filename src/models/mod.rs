use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::CONFIG;
use crate::error::DBError;

pub mod reading;

pub async fn establish_db_connection() -> Result<SqlitePool, DBError> {
    let database_url = CONFIG.database_url();
    if let Some(dir) = database_file_dir(&database_url) {
        let _ = std::fs::create_dir_all(dir);
    }

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    Ok(SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?)
}

pub async fn init_schema(conn: &SqlitePool) -> Result<(), DBError> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS sensor_readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            water_level REAL NOT NULL,
            ph_level REAL NOT NULL,
            temperature REAL NOT NULL,
            humidity REAL NOT NULL,
            tds_level REAL NOT NULL,
            dissolved_oxygen REAL NOT NULL
        )"#,
    )
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn check_schema(conn: &SqlitePool) -> Result<(), DBError> {
    sqlx::query("SELECT count(*) FROM sensor_readings")
        .fetch_one(conn)
        .await?;
    Ok(())
}

fn database_file_dir(url: &str) -> Option<&std::path::Path> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

#[cfg(test)]
pub(crate) async fn establish_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let conn = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    init_schema(&conn).await.unwrap();
    conn
}

#[cfg(test)]
mod test;
