use super::*;

/// What a lookup chain starts from.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    City(String),
    Coords(f64, f64),
    Geolocate,
}

impl LookupRequest {
    /// The lookup implied by the command line, if any.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        if let Some(city) = cli.city.clone() {
            return Some(LookupRequest::City(city));
        }
        cli.coords()
            .map(|(lat, lon)| LookupRequest::Coords(lat, lon))
    }
}

pub fn weather_client(cli: &Cli) -> Result<WeatherClient, LookupError> {
    let api_key = cli
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(LookupError::MissingApiKey)?;
    Ok(WeatherClient::with_base_urls(
        cli.weather_url.as_deref().unwrap_or(DEFAULT_WEATHER_URL),
        cli.geo_url.as_deref().unwrap_or(DEFAULT_GEO_URL),
        api_key,
    ))
}

/// Coordinates, then weather, then a place name. Any failure ends the chain.
pub async fn run_lookup(
    client: &WeatherClient,
    request: LookupRequest,
) -> Result<WeatherReport, LookupError> {
    let (lat, lon) = match request {
        LookupRequest::City(city) => {
            let location = client.search_city(&city).await?;
            (location.latitude, location.longitude)
        }
        LookupRequest::Coords(lat, lon) => (lat, lon),
        LookupRequest::Geolocate => geoip::detect_coords().await?,
    };
    let mut report = client.weather_at(lat, lon).await?;
    report.place_name = client.place_name(lat, lon).await;
    Ok(report)
}

impl AppState {
    pub(crate) async fn submit_search(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        let city = self.search.buffer.trim().to_string();
        self.start_lookup(LookupRequest::City(city), tx, cli).await
    }

    pub(crate) async fn start_lookup(
        &mut self,
        request: LookupRequest,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        if self.lookup_in_flight {
            log::debug!("lookup already running, ignoring {request:?}");
            return Ok(());
        }
        if matches!(&request, LookupRequest::City(city) if city.trim().is_empty()) {
            self.apply_failure(&LookupError::EmptyCity);
            return Ok(());
        }
        let client = match weather_client(cli) {
            Ok(client) => client,
            Err(err) => {
                self.apply_failure(&err);
                return Ok(());
            }
        };

        log::info!("lookup started: {request:?}");
        tx.send(AppEvent::LookupStarted).await?;
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let event = match run_lookup(&client, request).await {
                Ok(report) => AppEvent::LookupSucceeded(Box::new(report)),
                Err(err) => AppEvent::LookupFailed(err),
            };
            let _ = tx2.send(event).await;
        });
        Ok(())
    }
}
