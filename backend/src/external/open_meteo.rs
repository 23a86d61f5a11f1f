//! Weather API client for fetching current conditions
//!
//! Integrates with the Open-Meteo forecast API. One outbound call per
//! reading, fixed query parameters, no caching and no retries — callers
//! re-trigger manually on failure.

use reqwest::Client;
use serde::Deserialize;
use shared::{representative_soil_temperature, GpsCoordinates, WeatherReading};

use crate::error::{AppError, AppResult};

/// Current-condition fields requested from the API
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,soil_temperature_0cm,soil_temperature_6cm";

/// Fixed reporting timezone
const TIMEZONE: &str = "America/Sao_Paulo";

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

/// Open-Meteo forecast response (current block only)
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: Option<f64>,
    soil_temperature_0cm: f64,
    soil_temperature_6cm: f64,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    /// Create a new OpenMeteoClient
    pub fn new() -> Self {
        Self::with_base_url("https://api.open-meteo.com/v1".to_string())
    }

    /// Create a new OpenMeteoClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Fetch current conditions for a coordinate pair and derive the
    /// representative soil temperature.
    pub async fn fetch_current(&self, location: &GpsCoordinates) -> AppResult<WeatherReading> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&timezone={}",
            self.base_url, location.latitude, location.longitude, CURRENT_FIELDS, TIMEZONE
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::WeatherUpstream(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::WeatherUpstream(format!(
                "Erro na API: {}",
                response.status().as_u16()
            )));
        }

        let data: ForecastResponse = response.json().await.map_err(|e| {
            AppError::WeatherUpstream(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(Self::convert_current(data.current))
    }

    fn convert_current(current: CurrentConditions) -> WeatherReading {
        WeatherReading {
            temperature_c: current.temperature_2m.round(),
            humidity_pct: current.relative_humidity_2m.round(),
            precipitation_mm: current.precipitation.unwrap_or(0.0),
            soil_temperature_c: representative_soil_temperature(
                current.soil_temperature_0cm,
                current.soil_temperature_6cm,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn location() -> GpsCoordinates {
        GpsCoordinates::new(
            Decimal::from_str("-23.5505").unwrap(),
            Decimal::from_str("-46.6333").unwrap(),
        )
    }

    #[tokio::test]
    async fn fetch_current_derives_the_reading() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/forecast")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "-23.5505".into()),
                Matcher::UrlEncoded("longitude".into(), "-46.6333".into()),
                Matcher::UrlEncoded("timezone".into(), "America/Sao_Paulo".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "current": {
                        "temperature_2m": 24.6,
                        "relative_humidity_2m": 59.7,
                        "precipitation": 0.0,
                        "soil_temperature_0cm": 20.0,
                        "soil_temperature_6cm": 18.0
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(server.url());
        let reading = client.fetch_current(&location()).await.unwrap();

        assert_eq!(reading.temperature_c, 25.0);
        assert_eq!(reading.humidity_pct, 60.0);
        assert_eq!(reading.precipitation_mm, 0.0);
        assert_eq!(reading.soil_temperature_c, 19.4);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn absent_precipitation_reads_as_zero() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "current": {
                        "temperature_2m": 18.0,
                        "relative_humidity_2m": 80.0,
                        "soil_temperature_0cm": 15.0,
                        "soil_temperature_6cm": 14.0
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(server.url());
        let reading = client.fetch_current(&location()).await.unwrap();
        assert_eq!(reading.precipitation_mm, 0.0);
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(server.url());
        let err = client.fetch_current(&location()).await.unwrap_err();

        match err {
            AppError::WeatherUpstream(message) => {
                assert!(message.contains("500"), "unexpected message: {message}")
            }
            other => panic!("expected WeatherUpstream, got {other:?}"),
        }
    }
}
