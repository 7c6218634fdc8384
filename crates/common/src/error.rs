//! Unified error type for the weather dashboard.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("OpenWeather API error (status={status}): {message}")]
    WeatherApi { status: u16, message: String },

    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),

    #[error("Timed out after {timeout_ms}ms: {context}")]
    Timeout { context: String, timeout_ms: u64 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("City list error: {0}")]
    CityList(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
