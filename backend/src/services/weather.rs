//! Weather service
//!
//! Composes the Open-Meteo provider with the recommendation engine.
//! Readings are derived per request; nothing is cached or persisted.

use serde::Serialize;

use crate::error::AppResult;
use crate::external::OpenMeteoClient;
use shared::{recommend, GpsCoordinates, IrrigationRecommendation, WeatherReading};

/// Weather service
#[derive(Clone, Default)]
pub struct WeatherService {
    client: OpenMeteoClient,
}

/// A reading and its derived recommendation, recomputed together on
/// every refresh
#[derive(Debug, Serialize)]
pub struct WeatherOverview {
    pub reading: WeatherReading,
    pub recommendation: IrrigationRecommendation,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an explicit client (for testing)
    pub fn with_client(client: OpenMeteoClient) -> Self {
        Self { client }
    }

    /// Fetch current conditions and derive the irrigation recommendation.
    pub async fn current_overview(&self, location: &GpsCoordinates) -> AppResult<WeatherOverview> {
        let reading = self.client.fetch_current(location).await?;
        Ok(WeatherOverview {
            recommendation: recommend(&reading),
            reading,
        })
    }
}
