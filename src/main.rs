mod camera;
mod config;
mod error;
mod logging;
mod models;
mod rest;
mod sensor;

#[tokio::main]
pub async fn main() {
    logging::init();

    let db_conn = models::establish_db_connection()
        .await
        .expect("Failed connecting to the database");
    models::init_schema(&db_conn)
        .await
        .expect("Failed initializing the database schema");

    let observer = sensor::ConcurrentSensorObserver::new(db_conn);
    rest::dispatch_server(observer).await;
}
