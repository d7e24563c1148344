use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};

use crate::domain::{
    error::LookupError,
    weather::{CurrentConditions, HourlyEntry, Location, WeatherReport},
};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org";
const FALLBACK_PLACE: &str = "Current Location";

/// OpenWeather geocoding plus One Call client.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    weather_url: String,
    geo_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn with_base_urls(
        weather_url: impl Into<String>,
        geo_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            weather_url: trim_slash(weather_url.into()),
            geo_url: trim_slash(geo_url.into()),
            api_key: api_key.into(),
        }
    }

    /// Resolves a city name to its first geocoding match.
    pub async fn search_city(&self, city: &str) -> Result<Location, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyCity);
        }

        let request = self
            .client
            .get(format!("{}/geo/1.0/direct", self.geo_url))
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())]);
        let response = send(request)
            .await?
            .error_for_status()
            .map_err(|err| LookupError::GeocodeRejected {
                status: status_of(&err),
            })?;

        let places: Vec<GeoPlace> = decode(response).await?;
        places
            .into_iter()
            .next()
            .map(GeoPlace::into_location)
            .ok_or_else(|| LookupError::CityNotFound(city.to_string()))
    }

    /// Current conditions plus the hourly forecast at a coordinate.
    ///
    /// The returned report carries a placeholder place name; callers fill it
    /// from [`WeatherClient::place_name`] or the geocoding match.
    pub async fn weather_at(&self, lat: f64, lon: f64) -> Result<WeatherReport, LookupError> {
        let request = self
            .client
            .get(format!("{}/data/3.0/onecall", self.weather_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", "metric".to_string()),
                ("exclude", "minutely,daily,alerts".to_string()),
                ("appid", self.api_key.clone()),
            ]);
        let response = send(request)
            .await?
            .error_for_status()
            .map_err(|err| LookupError::WeatherRejected {
                status: status_of(&err),
            })?;

        let payload: OneCallResponse = decode(response).await?;
        Ok(payload.into_report())
    }

    /// Reverse-geocodes a coordinate, degrading to a generic label.
    pub async fn place_name(&self, lat: f64, lon: f64) -> String {
        match self.reverse(lat, lon).await {
            Ok(Some(location)) => location.name,
            Ok(None) => FALLBACK_PLACE.to_string(),
            Err(err) => {
                log::warn!("reverse geocoding failed: {err}");
                FALLBACK_PLACE.to_string()
            }
        }
    }

    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<Location>, LookupError> {
        let request = self
            .client
            .get(format!("{}/geo/1.0/reverse", self.geo_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key.clone()),
            ]);
        let response = send(request)
            .await?
            .error_for_status()
            .map_err(|err| LookupError::GeocodeRejected {
                status: status_of(&err),
            })?;
        let places: Vec<GeoPlace> = decode(response).await?;
        Ok(places.into_iter().next().map(GeoPlace::into_location))
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

async fn send(request: RequestBuilder) -> Result<Response, LookupError> {
    request
        .send()
        .await
        .map_err(|err| LookupError::Network(err.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, LookupError> {
    response
        .json()
        .await
        .map_err(|err| LookupError::Decode(err.to_string()))
}

fn status_of(err: &reqwest::Error) -> u16 {
    err.status().map_or(0, |status| status.as_u16())
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    name: String,
    lat: f64,
    lon: f64,
}

impl GeoPlace {
    fn into_location(self) -> Location {
        Location {
            name: self.name,
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    timezone_offset: i32,
    current: CurrentPayload,
    #[serde(default)]
    hourly: Vec<HourlyPayload>,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    id: u16,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    dt: i64,
    temp: f32,
    feels_like: f32,
    #[serde(default)]
    uvi: f32,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
}

#[derive(Debug, Deserialize)]
struct HourlyPayload {
    dt: i64,
    temp: f32,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
}

/// Condition id used when the provider omits the `weather` array.
const UNKNOWN_CONDITION: u16 = 804;

impl OneCallResponse {
    fn into_report(self) -> WeatherReport {
        let (condition_code, description) = self
            .current
            .weather
            .into_iter()
            .next()
            .map_or((UNKNOWN_CONDITION, String::new()), |w| (w.id, w.description));

        WeatherReport {
            place_name: FALLBACK_PLACE.to_string(),
            timezone_offset: self.timezone_offset,
            current: CurrentConditions {
                temperature_c: self.current.temp,
                feels_like_c: self.current.feels_like,
                uv_index: self.current.uvi,
                condition_code,
                description,
                observed_at: self.current.dt,
            },
            hourly: self
                .hourly
                .into_iter()
                .map(|hour| HourlyEntry {
                    time: hour.dt,
                    temperature_c: hour.temp,
                    condition_code: hour.weather.first().map_or(UNKNOWN_CONDITION, |w| w.id),
                })
                .collect(),
        }
    }
}
