pub mod generator;
mod observer;

pub use observer::ConcurrentSensorObserver;
