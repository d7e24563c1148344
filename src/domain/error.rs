use thiserror::Error;

/// Failures of a single weather lookup chain.
///
/// Every variant renders as the message shown on the error card.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter a city name.")]
    EmptyCity,
    #[error("Could not find city: {0}")]
    CityNotFound(String),
    #[error("City not found.")]
    GeocodeRejected { status: u16 },
    #[error("Could not fetch weather data.")]
    WeatherRejected { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Geolocation denied. Please search for a city.")]
    GeolocationUnavailable,
    #[error("No API key configured. Set OPENWEATHER_API_KEY or pass --api-key.")]
    MissingApiKey,
}
