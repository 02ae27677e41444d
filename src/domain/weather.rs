use crate::domain::Error;
use crate::external_connections::ExternalConnectivity;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastEntry {
    pub date: String,
    pub weather: String,
}

/// What the weather service answered with. `entries` is `None` when the body was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastResponse {
    pub status: u16,
    pub entries: Option<Vec<ForecastEntry>>,
}

/// Ways the weather service can let us down. All of these are upstream faults.
#[derive(Debug, thiserror::Error)]
pub enum WeatherFault {
    #[error("the weather service responded with status {0}")]
    BadStatus(u16),
    #[error("the weather service returned no forecast data")]
    EmptyForecast,
    #[error("the weather service could not be reached: {0}")]
    Unavailable(anyhow::Error),
}

pub mod driven_ports {
    use super::*;

    pub trait WeatherReader {
        async fn fetch_forecast(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<ForecastResponse, anyhow::Error>;
    }
}

/// Picks today's weather out of a forecast response. Anything other than a successful
/// response with at least one entry is rejected.
pub fn todays_weather(response: ForecastResponse) -> Result<String, WeatherFault> {
    if !(200..300).contains(&response.status) {
        return Err(WeatherFault::BadStatus(response.status));
    }

    response
        .entries
        .and_then(|entries| entries.into_iter().next())
        .map(|entry| entry.weather)
        .ok_or(WeatherFault::EmptyForecast)
}

pub(super) async fn fetch_todays_weather(
    ext_cxn: &mut impl ExternalConnectivity,
    weather_reader: &impl driven_ports::WeatherReader,
) -> Result<String, Error> {
    let response = weather_reader
        .fetch_forecast(ext_cxn)
        .await
        .map_err(WeatherFault::Unavailable)?;

    todays_weather(response).map_err(|fault| {
        warn!("Unusable weather forecast: {fault}");
        Error::from(fault)
    })
}
