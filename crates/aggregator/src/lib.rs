//! Weather aggregation crate.
//!
//! Resolves current conditions for the configured cities through a
//! short-lived in-memory cache.

pub mod aggregator;
pub mod cache;
pub mod cities;

pub use aggregator::{Dashboard, WeatherAggregator, DEFAULT_FETCH_TIMEOUT};
pub use cache::{CacheEntry, WeatherCache, CACHE_TTL};
pub use cities::CityListFile;
