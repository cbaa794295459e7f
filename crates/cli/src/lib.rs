//! Конфигурация и демонстрационный сценарий для бинарника `di-demo`

pub mod config;
pub mod demo;

pub use config::{loader, AppConfig, APP_NAME, ENV_PREFIX};
pub use demo::{run, SinkSelection};
