//! Application configuration: TOML file plus environment overrides.

pub mod app;

pub use app::{AppConfig, AuthConfig, StorageConfig};
