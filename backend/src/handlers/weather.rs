//! Weather HTTP handlers

use axum::{extract::Query, Json};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::weather::{WeatherOverview, WeatherService};
use shared::GpsCoordinates;

/// Query parameters for weather lookups
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Fetch current conditions and the derived irrigation recommendation
pub async fn get_current_weather(
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<WeatherOverview>> {
    let service = WeatherService::new();
    let overview = service
        .current_overview(&GpsCoordinates::new(query.latitude, query.longitude))
        .await?;
    Ok(Json(overview))
}
