use crate::domain;
use crate::domain::weather::{ForecastEntry, ForecastResponse};
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use serde::Deserialize;

/// Reads the forecast from an HTTP service which answers with a JSON array of
/// `{"date": ..., "weather": ...}` objects
pub struct HttpWeatherReader {
    pub forecast_url: String,
}

#[derive(Deserialize)]
struct ForecastEntryBody {
    date: String,
    weather: String,
}

impl From<ForecastEntryBody> for ForecastEntry {
    fn from(value: ForecastEntryBody) -> Self {
        ForecastEntry {
            date: value.date,
            weather: value.weather,
        }
    }
}

impl domain::weather::driven_ports::WeatherReader for HttpWeatherReader {
    #[tracing::instrument(skip_all, fields(forecast_url = %self.forecast_url))]
    async fn fetch_forecast(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<ForecastResponse, anyhow::Error> {
        let response = ext_cxn
            .http_client()
            .get(&self.forecast_url)
            .send()
            .await
            .context("Requesting the weather forecast")?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ForecastResponse {
                status: status.as_u16(),
                entries: None,
            });
        }

        let entries = response
            .json::<Option<Vec<ForecastEntryBody>>>()
            .await
            .context("Decoding the weather forecast")?
            .map(|body| body.into_iter().map(ForecastEntry::from).collect());

        Ok(ForecastResponse {
            status: status.as_u16(),
            entries,
        })
    }
}
