//! Cache-backed weather aggregator.
//!
//! Resolves one record per requested city: a fresh cache entry if there is
//! one, otherwise a fetch from the weather source. Each city is resolved in
//! its own task; a failed city becomes an "unavailable" record and never
//! affects the others.

use std::sync::Arc;
use std::time::Duration;

use common::{CityCode, CityId, Error, WeatherRecord, WeatherSource};
use tracing::{debug, info, warn};

use crate::cache::WeatherCache;
use crate::cities::CityListFile;

/// Default bound on a single upstream fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves weather records for a set of cities.
pub struct WeatherAggregator<S> {
    source: Arc<S>,
    cache: WeatherCache,
    fetch_timeout: Duration,
}

// Clones share the source; `S` need not be `Clone`.
impl<S> Clone for WeatherAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: self.cache.clone(),
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<S: WeatherSource> WeatherAggregator<S> {
    pub fn new(source: S, cache: WeatherCache) -> Self {
        Self {
            source: Arc::new(source),
            cache,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Resolve every city in `codes`, returning records in the same order.
    ///
    /// All cities are resolved concurrently. The result always has one
    /// record per input code; duplicates are resolved independently and a
    /// code without an ID becomes an unavailable record with no ID.
    pub async fn resolve_all(&self, codes: &[CityCode]) -> Vec<WeatherRecord> {
        let pending: Vec<_> = codes
            .iter()
            .map(|code| match code {
                CityCode::Id(id) => {
                    let (this, id) = (self.clone(), *id);
                    Ok((id, tokio::spawn(async move { this.resolve_one(id).await })))
                }
                CityCode::Invalid(raw) => {
                    warn!("Cannot fetch weather for invalid city code {}", raw);
                    Err(WeatherRecord::unavailable(None))
                }
            })
            .collect();

        let mut records = Vec::with_capacity(pending.len());
        for entry in pending {
            match entry {
                Ok((id, handle)) => match handle.await {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warn!("Resolution task for city {} failed: {}", id, e);
                        records.push(WeatherRecord::unavailable(id));
                    }
                },
                Err(record) => records.push(record),
            }
        }
        records
    }

    /// Resolve one city from cache or the weather source.
    pub async fn resolve_one(&self, id: CityId) -> WeatherRecord {
        if let Some(record) = self.cache.get(id) {
            debug!("Cache hit for city {}", id);
            return record;
        }

        match self.fetch(id).await {
            Ok(record) => {
                info!("Fetched fresh data for {} ({})", record.name, id);
                self.cache.insert(id, record.clone());
                record
            }
            Err(e) => {
                warn!("Failed to fetch weather for city {}: {}", id, e);
                WeatherRecord::unavailable(id)
            }
        }
    }

    async fn fetch(&self, id: CityId) -> Result<WeatherRecord, Error> {
        let conditions = tokio::time::timeout(self.fetch_timeout, self.source.fetch_current(id))
            .await
            .map_err(|_| Error::Timeout {
                context: format!("weather fetch for city {id}"),
                timeout_ms: self.fetch_timeout.as_millis() as u64,
            })??;

        Ok(WeatherRecord::from_conditions(id, &conditions))
    }
}

/// Binds the aggregator to the configured city list.
pub struct Dashboard<S> {
    cities: CityListFile,
    aggregator: WeatherAggregator<S>,
}

impl<S: WeatherSource> Dashboard<S> {
    pub fn new(cities: CityListFile, aggregator: WeatherAggregator<S>) -> Self {
        Self { cities, aggregator }
    }

    /// Current records for every configured city.
    pub async fn current_weather(&self) -> Vec<WeatherRecord> {
        let codes = self.cities.city_codes().await;
        self.aggregator.resolve_all(&codes).await
    }

    pub fn cities(&self) -> &CityListFile {
        &self.cities
    }

    pub fn aggregator(&self) -> &WeatherAggregator<S> {
        &self.aggregator
    }
}
