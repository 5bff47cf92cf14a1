use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::env;

pub struct Config {
    inner: RwLock<InnerConfig>,
}

struct InnerConfig {
    server_port: u16,
    database_url: String,
    placeholder_path: String,
    device_indices: Vec<usize>,
    fallback_on_empty: bool,
}

impl Config {
    pub fn server_port(&self) -> u16 {
        self.inner.read().server_port
    }

    pub fn database_url(&self) -> String {
        let inner = self.inner.read();
        inner.database_url.clone()
    }

    pub fn placeholder_path(&self) -> String {
        let inner = self.inner.read();
        inner.placeholder_path.clone()
    }

    pub fn device_indices(&self) -> Vec<usize> {
        let inner = self.inner.read();
        inner.device_indices.clone()
    }

    /// Whether an empty store answers with a generated reading
    /// instead of a 404
    pub fn fallback_on_empty(&self) -> bool {
        self.inner.read().fallback_on_empty
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv::dotenv().ok();

    let server_port = env::var("SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:database/hydroponics.db".to_owned());
    let placeholder_path =
        env::var("PLACEHOLDER_PATH").unwrap_or_else(|_| "static/placeholder.jpg".to_owned());
    let device_indices: Vec<usize> = env::var("CAMERA_DEVICES")
        .unwrap_or_else(|_| "0,1,2".to_owned())
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let fallback_on_empty = env::var("FALLBACK_ON_EMPTY")
        .map(|v| v.trim() != "false")
        .unwrap_or(true);

    Config {
        inner: RwLock::new(InnerConfig {
            server_port,
            database_url,
            placeholder_path,
            device_indices,
            fallback_on_empty,
        }),
    }
});
