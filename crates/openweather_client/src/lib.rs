//! OpenWeatherMap API client.
//!
//! Fetches current conditions by city ID from the `data/2.5/weather`
//! endpoint and converts them to the shared `CurrentConditions` format.

use common::{CityId, CurrentConditions, Error, WeatherSource};
use serde::Deserialize;
use tracing::debug;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const UNITS: &str = "metric";

/// OpenWeatherMap API client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Response from `data/2.5/weather`. Only the fields the dashboard reads.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub wind: Option<Wind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: Option<f64>,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("weather-dashboard/0.1")
            .pool_max_idle_per_host(8)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build OpenWeather HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the raw current-weather payload for a city.
    pub async fn fetch_current_weather(&self, id: CityId) -> Result<CurrentWeatherResponse, Error> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);
        let query = [
            ("id", id.to_string()),
            ("appid", self.api_key.clone()),
            ("units", UNITS.to_string()),
        ];

        debug!("Fetching current weather: {} id={}", url, id);

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Http(format!("HTTP error for city {id}: {e}")))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::WeatherApi {
                status,
                message: format!("city {id}: {}", truncate(&body, 500)),
            });
        }

        resp.json()
            .await
            .map_err(|e| Error::MalformedPayload(format!("JSON parse error for city {id}: {e}")))
    }

    /// Fetch and convert current conditions for a city.
    pub async fn get_conditions(&self, id: CityId) -> Result<CurrentConditions, Error> {
        let payload = self.fetch_current_weather(id).await?;
        to_conditions(id, payload)
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, id: CityId) -> Result<CurrentConditions, Error> {
        self.get_conditions(id).await
    }
}

fn truncate(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

fn to_conditions(id: CityId, payload: CurrentWeatherResponse) -> Result<CurrentConditions, Error> {
    let missing = |field: &str| Error::MalformedPayload(format!("city {id}: missing {field}"));

    let condition = payload.weather.into_iter().next().ok_or_else(|| missing("weather[0]"))?;
    let main = payload.main.ok_or_else(|| missing("main"))?;
    let wind = payload.wind.ok_or_else(|| missing("wind"))?;

    Ok(CurrentConditions {
        name: payload.name.ok_or_else(|| missing("name"))?,
        description: condition.description.ok_or_else(|| missing("weather[0].description"))?,
        temp_c: main.temp.ok_or_else(|| missing("main.temp"))?,
        icon: condition.icon.ok_or_else(|| missing("weather[0].icon"))?,
        humidity: main.humidity.ok_or_else(|| missing("main.humidity"))?,
        wind_speed: wind.speed.ok_or_else(|| missing("wind.speed"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn sample_response() -> &'static str {
        r#"{
            "coord": {"lon": 79.8478, "lat": 6.9319},
            "weather": [
                {"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}
            ],
            "base": "stations",
            "main": {"temp": 29.62, "feels_like": 35.1, "pressure": 1010, "humidity": 79},
            "visibility": 10000,
            "wind": {"speed": 4.63, "deg": 250},
            "id": 1248991,
            "name": "Colombo",
            "cod": 200
        }"#
    }

    #[test]
    fn test_deserialize_current_weather() {
        let parsed: CurrentWeatherResponse =
            serde_json::from_str(sample_response()).expect("response should deserialize");

        assert_eq!(parsed.name.as_deref(), Some("Colombo"));
        assert_eq!(parsed.weather.len(), 1);
        assert_eq!(parsed.main.as_ref().and_then(|m| m.humidity), Some(79));
    }

    #[test]
    fn test_to_conditions_maps_fields() {
        let parsed: CurrentWeatherResponse =
            serde_json::from_str(sample_response()).expect("response should deserialize");

        let conditions = to_conditions(CityId(1248991), parsed).expect("conditions should build");

        assert_eq!(conditions.name, "Colombo");
        assert_eq!(conditions.description, "scattered clouds");
        assert!((conditions.temp_c - 29.62).abs() < 1e-9);
        assert_eq!(conditions.icon, "03d");
        assert_eq!(conditions.humidity, 79);
        assert!((conditions.wind_speed - 4.63).abs() < 1e-9);
    }

    #[test]
    fn test_empty_weather_array_is_malformed() {
        let parsed: CurrentWeatherResponse = serde_json::from_str(
            r#"{"weather": [], "main": {"temp": 1.0, "humidity": 2}, "wind": {"speed": 3.0}, "name": "X"}"#,
        )
        .expect("response should deserialize");

        let err = to_conditions(CityId(1), parsed).expect_err("empty weather must fail");
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("héllo", 2), "hé");
    }

    #[tokio::test]
    async fn test_get_conditions_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", CURRENT_WEATHER_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "1248991".into()),
                Matcher::UrlEncoded("appid".into(), "test-key".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sample_response())
            .create_async()
            .await;

        let client = OpenWeatherClient::new("test-key".into(), server.url());
        let conditions = client
            .fetch_current(CityId(1248991))
            .await
            .expect("fetch should succeed");

        assert_eq!(conditions.name, "Colombo");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", CURRENT_WEATHER_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"cod":401,"message":"Invalid API key."}"#)
            .create_async()
            .await;

        let client = OpenWeatherClient::new("bad-key".into(), server.url());
        let err = client
            .fetch_current(CityId(1248991))
            .await
            .expect_err("401 must fail");

        match err {
            Error::WeatherApi { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", CURRENT_WEATHER_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = OpenWeatherClient::new("test-key".into(), server.url());
        let err = client
            .fetch_current(CityId(1))
            .await
            .expect_err("invalid body must fail");

        assert!(matches!(err, Error::MalformedPayload(_)));
    }
}
