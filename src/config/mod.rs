//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, FeedConfig, HashingConfig, LogFormat, LoggingConfig, ServerConfig, StorageSettings,
};
