//! Shared types, config, and error definitions for the weather dashboard.

pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::DashboardConfig;
pub use error::Error;
pub use source::WeatherSource;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
