//! Configuration loader — merges env vars, .env file, and an optional TOML file.

use common::config::DashboardConfig;
use common::Error;
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_port(raw: &str) -> Result<u16, Error> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| Error::Config("PORT must be an integer in 0..=65535".into()))
}

fn validate_config(config: &DashboardConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.openweather_api_key.trim().is_empty() {
        issues.push("OPENWEATHER_API_KEY is required (set in .env or environment)".into());
    }
    if config.fetch_timeout_secs == 0 {
        issues.push("fetch_timeout_secs must be > 0".into());
    }
    if !(config.openweather_base_url.starts_with("http://")
        || config.openweather_base_url.starts_with("https://"))
    {
        issues.push("openweather_base_url must start with http:// or https://".into());
    }
    if config.cities_file.as_os_str().is_empty() {
        issues.push("cities_file must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply environment overrides on top of `config`. `lookup` returns the
/// value of an environment variable, if set.
fn apply_env_overrides(
    config: &mut DashboardConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if let Some(key) = lookup("OPENWEATHER_API_KEY") {
        config.openweather_api_key = key;
    }
    if let Some(url) = lookup("OPENWEATHER_BASE_URL") {
        config.openweather_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(port) = lookup("PORT") {
        config.port = parse_port(&port)?;
    }
    if let Some(path) = lookup("CITIES_FILE") {
        config.cities_file = path.trim().into();
    }
    if let Some(raw) = lookup("WEATHER_FETCH_TIMEOUT_SECS") {
        config.fetch_timeout_secs = parse_positive_u64(&raw, "WEATHER_FETCH_TIMEOUT_SECS")?;
    }
    Ok(())
}

/// Load dashboard configuration from environment and optional config file.
pub fn load_config(config_path: &Path) -> Result<DashboardConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = DashboardConfig::default();

    // 3. Try loading the config file if it exists.
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    }

    // 4. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
