use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::error::LookupError;

const GEOIP_URL: &str = "https://ipapi.co/json/";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Approximate device coordinates from the public IP address.
pub async fn detect_coords() -> Result<(f64, f64), LookupError> {
    detect_coords_from(GEOIP_URL).await
}

pub async fn detect_coords_from(url: &str) -> Result<(f64, f64), LookupError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|_| LookupError::GeolocationUnavailable)?;
    let response: IpApiResponse = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|err| {
            log::warn!("ip geolocation request failed: {err}");
            LookupError::GeolocationUnavailable
        })?
        .json()
        .await
        .map_err(|_| LookupError::GeolocationUnavailable)?;

    match (response.latitude, response.longitude) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(LookupError::GeolocationUnavailable),
    }
}
