//! The seam between the aggregator and whatever supplies current conditions.

use std::future::Future;

use crate::{CityId, CurrentConditions, Error};

/// A remote source of current weather conditions, keyed by city ID.
///
/// Any error is treated the same way by callers: the city is reported as
/// unavailable for this request.
pub trait WeatherSource: Send + Sync + 'static {
    fn fetch_current(
        &self,
        id: CityId,
    ) -> impl Future<Output = Result<CurrentConditions, Error>> + Send;
}
