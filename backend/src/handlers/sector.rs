//! Sector HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::{sector::SectorInput, SectorService};
use crate::AppState;
use shared::IrrigationEvent;

/// List all sectors, newest first
pub async fn list_sectors(State(state): State<AppState>) -> impl IntoResponse {
    let service = SectorService::new(state.db.clone());

    match service.list().await {
        Ok(sectors) => {
            (StatusCode::OK, Json(serde_json::json!({ "sectors": sectors }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a new sector
pub async fn create_sector(
    State(state): State<AppState>,
    Json(input): Json<SectorInput>,
) -> impl IntoResponse {
    let service = SectorService::new(state.db.clone());

    match service.create(input).await {
        Ok(sector) => (StatusCode::CREATED, Json(sector)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a sector's mutable fields
pub async fn update_sector(
    State(state): State<AppState>,
    Path(sector_id): Path<Uuid>,
    Json(input): Json<SectorInput>,
) -> impl IntoResponse {
    let service = SectorService::new(state.db.clone());

    match service.update(sector_id, input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a sector
pub async fn delete_sector(
    State(state): State<AppState>,
    Path(sector_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SectorService::new(state.db.clone());

    match service.delete(sector_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Body for recording an irrigation event
#[derive(Debug, Deserialize)]
pub struct RecordIrrigationInput {
    /// Session start; defaults to now
    pub at: Option<DateTime<Utc>>,
    pub ml: i32,
    pub duration_min: i32,
}

/// Append an irrigation event to a sector's capped history
pub async fn record_irrigation(
    State(state): State<AppState>,
    Path(sector_id): Path<Uuid>,
    Json(input): Json<RecordIrrigationInput>,
) -> impl IntoResponse {
    let service = SectorService::new(state.db.clone());
    let event = IrrigationEvent {
        at: input.at.unwrap_or_else(Utc::now),
        ml: input.ml,
        duration_min: input.duration_min,
    };

    match service.record_irrigation(sector_id, event).await {
        Ok(sector) => (StatusCode::CREATED, Json(sector)).into_response(),
        Err(e) => e.into_response(),
    }
}
