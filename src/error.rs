use std::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),
    #[error("No sensor data found")]
    NoData,
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("No capture device available")]
    DeviceUnavailable,
    #[error("Device I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub enum ObserverError {
    User(Box<dyn error::Error + Send + Sync>),
    NotFound(Box<dyn error::Error + Send + Sync>),
    Internal(Box<dyn error::Error + Send + Sync>),
}

impl From<DBError> for ObserverError {
    fn from(err: DBError) -> Self {
        ObserverError::Internal(Box::from(err))
    }
}

impl From<ApiError> for ObserverError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidTimestamp(_) => ObserverError::User(Box::from(err)),
            ApiError::NoData => ObserverError::NotFound(Box::from(err)),
        }
    }
}
