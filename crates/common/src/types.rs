//! Domain types shared across the dashboard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display name used for cities whose conditions could not be fetched.
pub const UNKNOWN_CITY_NAME: &str = "Unknown";
/// Description used for cities whose conditions could not be fetched.
pub const DATA_UNAVAILABLE: &str = "Data unavailable";
/// Icon shown for cities whose conditions could not be fetched (clear sky, day).
pub const DEFAULT_ICON: &str = "01d";
/// Wire marker for a numeric field with no value.
pub const NOT_AVAILABLE: &str = "N/A";

// ── Identifiers ───────────────────────────────────────────────────────

/// OpenWeatherMap city ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub u64);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One entry of the configured city list.
///
/// Codes that don't yield an ID are kept so the response still has one
/// record per configured city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityCode {
    Id(CityId),
    Invalid(String),
}

impl CityCode {
    pub fn id(&self) -> Option<CityId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Invalid(_) => None,
        }
    }
}

impl From<CityId> for CityCode {
    fn from(id: CityId) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for CityCode {
    fn from(id: u64) -> Self {
        Self::Id(CityId(id))
    }
}

// ── Remote payload ────────────────────────────────────────────────────

/// Current conditions for one city as reported by a weather source.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// City display name.
    pub name: String,
    /// Free-text condition, e.g. "light rain".
    pub description: String,
    /// Temperature in °C.
    pub temp_c: f64,
    /// Condition icon code, e.g. "10d".
    pub icon: String,
    /// Relative humidity, percent.
    pub humidity: u32,
    /// Wind speed in m/s.
    pub wind_speed: f64,
}

// ── Dashboard record ──────────────────────────────────────────────────

/// Weather snapshot for one city, as served to the frontend.
///
/// A record is either fully populated from a weather source, or degraded:
/// the ID is kept and every other field carries its "unavailable" value.
/// Both shapes serialize identically apart from the values. `id` is `null`
/// only for a configured code that never yielded an ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub id: Option<CityId>,
    pub name: String,
    pub description: String,
    /// Rounded temperature in °C.
    #[serde(with = "or_not_available")]
    pub temp: Option<i64>,
    pub icon: String,
    #[serde(with = "or_not_available")]
    pub humidity: Option<u32>,
    #[serde(with = "or_not_available")]
    pub wind_speed: Option<f64>,
}

impl WeatherRecord {
    /// Build a record from freshly fetched conditions.
    pub fn from_conditions(id: CityId, conditions: &CurrentConditions) -> Self {
        Self {
            id: Some(id),
            name: conditions.name.clone(),
            description: conditions.description.clone(),
            temp: Some(round_half_up(conditions.temp_c)),
            icon: conditions.icon.clone(),
            humidity: Some(conditions.humidity),
            wind_speed: Some(conditions.wind_speed),
        }
    }

    /// Placeholder record for a city whose fetch failed, or whose code
    /// was not a usable ID (`None`).
    pub fn unavailable(id: impl Into<Option<CityId>>) -> Self {
        Self {
            id: id.into(),
            name: UNKNOWN_CITY_NAME.into(),
            description: DATA_UNAVAILABLE.into(),
            temp: None,
            icon: DEFAULT_ICON.into(),
            humidity: None,
            wind_speed: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.temp.is_some()
    }
}

/// Round to the nearest integer, halves toward +∞ (21.5 → 22, -0.5 → 0).
pub fn round_half_up(value: f64) -> i64 {
    // Compare against the floor rather than adding 0.5 first; the addition
    // itself rounds for inputs just below .5 and for |x| > 2^52.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Serde adapter: `Some(v)` as `v`, `None` as `"N/A"`.
mod or_not_available {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::NOT_AVAILABLE;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Field<T> {
            Value(T),
            Marker(String),
        }

        match Field::<T>::deserialize(deserializer)? {
            Field::Value(v) => Ok(Some(v)),
            Field::Marker(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_conditions(temp_c: f64) -> CurrentConditions {
        CurrentConditions {
            name: "Colombo".into(),
            description: "scattered clouds".into(),
            temp_c,
            icon: "03d".into(),
            humidity: 79,
            wind_speed: 4.63,
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(21.6), 22);
        assert_eq!(round_half_up(21.4), 21);
        assert_eq!(round_half_up(21.5), 22);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.6), -1);
    }

    #[test]
    fn test_round_half_up_float_edges() {
        // Largest double below 0.5: adding 0.5 would round up to 1.0.
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(-0.49999999999999994), 0);
        // Odd integers above 2^52 are already integral.
        let big = 4_503_599_627_370_497.0_f64;
        assert_eq!(round_half_up(big), 4_503_599_627_370_497);
        assert_eq!(round_half_up(-big), -4_503_599_627_370_497);
    }

    #[test]
    fn test_record_from_conditions() {
        let record = WeatherRecord::from_conditions(CityId(1248991), &sample_conditions(29.7));

        assert_eq!(record.id, Some(CityId(1248991)));
        assert_eq!(record.name, "Colombo");
        assert_eq!(record.temp, Some(30));
        assert_eq!(record.humidity, Some(79));
        assert_eq!(record.wind_speed, Some(4.63));
        assert!(record.is_available());
    }

    #[test]
    fn test_available_record_wire_shape() {
        let record = WeatherRecord::from_conditions(CityId(1248991), &sample_conditions(29.7));
        let value = serde_json::to_value(&record).expect("record should serialize");

        assert_eq!(
            value,
            json!({
                "id": 1248991,
                "name": "Colombo",
                "description": "scattered clouds",
                "temp": 30,
                "icon": "03d",
                "humidity": 79,
                "windSpeed": 4.63
            })
        );
    }

    #[test]
    fn test_unavailable_record_wire_shape() {
        let record = WeatherRecord::unavailable(CityId(200));
        let value = serde_json::to_value(&record).expect("record should serialize");

        assert!(!record.is_available());
        assert_eq!(
            value,
            json!({
                "id": 200,
                "name": "Unknown",
                "description": "Data unavailable",
                "temp": "N/A",
                "icon": "01d",
                "humidity": "N/A",
                "windSpeed": "N/A"
            })
        );
    }

    #[test]
    fn test_record_deserializes_both_shapes() {
        let degraded: WeatherRecord = serde_json::from_value(json!({
            "id": 7, "name": "Unknown", "description": "Data unavailable",
            "temp": "N/A", "icon": "01d", "humidity": "N/A", "windSpeed": "N/A"
        }))
        .expect("degraded record should deserialize");
        assert_eq!(degraded, WeatherRecord::unavailable(CityId(7)));

        let unidentified: WeatherRecord = serde_json::from_value(json!({
            "id": null, "name": "Unknown", "description": "Data unavailable",
            "temp": "N/A", "icon": "01d", "humidity": "N/A", "windSpeed": "N/A"
        }))
        .expect("record without id should deserialize");
        assert_eq!(unidentified, WeatherRecord::unavailable(None));

        let live: WeatherRecord = serde_json::from_value(json!({
            "id": 8, "name": "Tokyo", "description": "clear sky",
            "temp": -3, "icon": "01n", "humidity": 40, "windSpeed": 1.5
        }))
        .expect("live record should deserialize");
        assert_eq!(live.temp, Some(-3));
        assert_eq!(live.wind_speed, Some(1.5));
    }
}
