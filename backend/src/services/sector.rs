//! Sector lifecycle store
//!
//! CRUD over the persisted sector collection. Owns the translations at
//! the storage boundary: crop label ↔ `moisture_level` column, bare
//! sensor numbers ↔ `"Sensor {n}"` labels, calendar dates on the wire,
//! and the capped `last_irrigations` history. Mutations are
//! refresh-after-write: callers re-list instead of consuming deltas.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    push_irrigation_event, validate_sector_name, HarvestStatus, IrrigationEvent, Sector,
    DEFAULT_FARM_NAME, DEFAULT_PRODUCT_LABEL, DEFAULT_QUANTITY_ML, DEFAULT_REPEAT_HOURS,
};

/// Sector service
#[derive(Clone)]
pub struct SectorService {
    db: PgPool,
}

const SECTOR_COLUMNS: &str = "id, name, farm_id, moisture_level, created_at, planting_date, \
                              harvest_eta, sensors, quantity_ml, repeat_every_hours, \
                              harvest_status, seedlings_planted, seedlings_harvested, \
                              observations, last_irrigations";

#[derive(Debug, sqlx::FromRow)]
struct SectorRow {
    id: Uuid,
    name: String,
    farm_id: Uuid,
    moisture_level: Option<String>,
    created_at: DateTime<Utc>,
    planting_date: Option<NaiveDate>,
    harvest_eta: Option<NaiveDate>,
    sensors: Option<Vec<String>>,
    quantity_ml: Option<i32>,
    repeat_every_hours: Option<i32>,
    harvest_status: Option<String>,
    seedlings_planted: Option<i32>,
    seedlings_harvested: Option<i32>,
    observations: Option<String>,
    last_irrigations: Option<serde_json::Value>,
}

impl From<SectorRow> for Sector {
    fn from(row: SectorRow) -> Self {
        Sector {
            id: row.id,
            name: row.name,
            farm_id: row.farm_id,
            product: row
                .moisture_level
                .unwrap_or_else(|| DEFAULT_PRODUCT_LABEL.to_string()),
            created_at: row.created_at,
            planting_date: row.planting_date,
            harvest_eta: row.harvest_eta,
            sensors: sensor_numbers(row.sensors.as_deref().unwrap_or_default()),
            quantity_ml: row.quantity_ml.unwrap_or(DEFAULT_QUANTITY_ML),
            repeat_every_hours: row.repeat_every_hours.unwrap_or(DEFAULT_REPEAT_HOURS),
            harvest_status: HarvestStatus::from_db(row.harvest_status.as_deref().unwrap_or("")),
            seedlings_planted: row.seedlings_planted.unwrap_or(0),
            seedlings_harvested: row.seedlings_harvested.unwrap_or(0),
            observations: row.observations,
            last_irrigations: row
                .last_irrigations
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default(),
        }
    }
}

/// Input for creating or replacing a sector. Replacement is whole-row:
/// omitted fields fall back to the creation defaults, not to the stored
/// values.
#[derive(Debug, Deserialize, Validate)]
pub struct SectorInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub product: Option<String>,
    pub planting_date: Option<NaiveDate>,
    pub harvest_eta: Option<NaiveDate>,
    pub sensors: Option<Vec<u32>>,
    pub quantity_ml: Option<i32>,
    pub repeat_every_hours: Option<i32>,
    pub harvest_status: Option<HarvestStatus>,
    pub seedlings_planted: Option<i32>,
    pub seedlings_harvested: Option<i32>,
    pub observations: Option<String>,
}

impl SectorInput {
    fn product(&self) -> String {
        self.product
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_LABEL.to_string())
    }

    fn sensor_labels(&self) -> Vec<String> {
        sensor_labels(self.sensors.as_deref().unwrap_or_default())
    }
}

/// Store-boundary translation: bare sensor numbers become labelled
/// strings in the `sensors` column.
fn sensor_labels(sensors: &[u32]) -> Vec<String> {
    sensors.iter().map(|n| format!("Sensor {}", n)).collect()
}

/// Inverse translation. Labels that do not carry a trailing number fall
/// back to their 1-based position.
fn sensor_numbers(labels: &[String]) -> Vec<u32> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            label
                .rsplit(' ')
                .next()
                .and_then(|suffix| suffix.parse().ok())
                .unwrap_or(index as u32 + 1)
        })
        .collect()
}

impl SectorService {
    /// Create a new SectorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all sectors, newest first.
    pub async fn list(&self) -> AppResult<Vec<Sector>> {
        let rows = sqlx::query_as::<_, SectorRow>(&format!(
            "SELECT {SECTOR_COLUMNS} FROM sectors ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Sector::from).collect())
    }

    /// Fetch one sector.
    pub async fn get(&self, sector_id: Uuid) -> AppResult<Sector> {
        let row = sqlx::query_as::<_, SectorRow>(&format!(
            "SELECT {SECTOR_COLUMNS} FROM sectors WHERE id = $1"
        ))
        .bind(sector_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sector".to_string()))?;

        Ok(row.into())
    }

    /// Create a sector, silently creating the default farm first when
    /// none exists yet.
    pub async fn create(&self, input: SectorInput) -> AppResult<Sector> {
        Self::validate(&input)?;

        let farm_id = self.ensure_farm().await?;

        let row = sqlx::query_as::<_, SectorRow>(&format!(
            r#"
            INSERT INTO sectors (name, farm_id, moisture_level, planting_date, harvest_eta,
                                 sensors, quantity_ml, repeat_every_hours, harvest_status,
                                 seedlings_planted, seedlings_harvested, observations,
                                 last_irrigations)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, '[]'::jsonb)
            RETURNING {SECTOR_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(farm_id)
        .bind(input.product())
        .bind(input.planting_date)
        .bind(input.harvest_eta)
        .bind(input.sensor_labels())
        .bind(input.quantity_ml.unwrap_or(DEFAULT_QUANTITY_ML))
        .bind(input.repeat_every_hours.unwrap_or(DEFAULT_REPEAT_HOURS))
        .bind(input.harvest_status.unwrap_or_default().as_str())
        .bind(input.seedlings_planted.unwrap_or(0))
        .bind(input.seedlings_harvested.unwrap_or(0))
        .bind(&input.observations)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Replace the mutable field set of a sector. An unknown id updates
    /// nothing and is not an error at this layer; callers pre-validate
    /// existence when they care.
    pub async fn update(&self, sector_id: Uuid, input: SectorInput) -> AppResult<()> {
        Self::validate(&input)?;

        sqlx::query(
            r#"
            UPDATE sectors
            SET name = $2, moisture_level = $3, planting_date = $4, harvest_eta = $5,
                sensors = $6, quantity_ml = $7, repeat_every_hours = $8, harvest_status = $9,
                seedlings_planted = $10, seedlings_harvested = $11, observations = $12
            WHERE id = $1
            "#,
        )
        .bind(sector_id)
        .bind(&input.name)
        .bind(input.product())
        .bind(input.planting_date)
        .bind(input.harvest_eta)
        .bind(input.sensor_labels())
        .bind(input.quantity_ml.unwrap_or(DEFAULT_QUANTITY_ML))
        .bind(input.repeat_every_hours.unwrap_or(DEFAULT_REPEAT_HOURS))
        .bind(input.harvest_status.unwrap_or_default().as_str())
        .bind(input.seedlings_planted.unwrap_or(0))
        .bind(input.seedlings_harvested.unwrap_or(0))
        .bind(&input.observations)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Delete a sector. Idempotent: deleting an absent id succeeds.
    pub async fn delete(&self, sector_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM sectors WHERE id = $1")
            .bind(sector_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Persist an irrigation event: front-insert into the capped
    /// history and return the refreshed sector.
    pub async fn record_irrigation(
        &self,
        sector_id: Uuid,
        event: IrrigationEvent,
    ) -> AppResult<Sector> {
        let mut sector = self.get(sector_id).await?;
        push_irrigation_event(&mut sector.last_irrigations, event);

        sqlx::query("UPDATE sectors SET last_irrigations = $2 WHERE id = $1")
            .bind(sector_id)
            .bind(serde_json::to_value(&sector.last_irrigations).map_err(|e| {
                AppError::Internal(format!("Failed to serialize irrigation history: {}", e))
            })?)
            .execute(&self.db)
            .await?;

        Ok(sector)
    }

    fn validate(input: &SectorInput) -> AppResult<()> {
        validate_sector_name(&input.name).map_err(|message| AppError::Validation {
            field: "name".to_string(),
            message: message.to_string(),
            message_pt: "Nome do setor não pode ser vazio".to_string(),
        })?;
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        Ok(())
    }

    async fn ensure_farm(&self) -> AppResult<Uuid> {
        let existing =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM farms ORDER BY created_at ASC LIMIT 1")
                .fetch_optional(&self.db)
                .await?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let id = sqlx::query_scalar::<_, Uuid>("INSERT INTO farms (name) VALUES ($1) RETURNING id")
            .bind(DEFAULT_FARM_NAME)
            .fetch_one(&self.db)
            .await?;

        tracing::info!(farm_id = %id, "created default farm");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_labels_round_trip() {
        let labels = sensor_labels(&[3, 5]);
        assert_eq!(labels, vec!["Sensor 3", "Sensor 5"]);
        assert_eq!(sensor_numbers(&labels), vec![3, 5]);
    }

    #[test]
    fn unlabelled_sensors_fall_back_to_position() {
        let labels = vec!["left bed".to_string(), "right bed".to_string()];
        assert_eq!(sensor_numbers(&labels), vec![1, 2]);
    }

    #[test]
    fn blank_product_gets_the_default_label() {
        let input = SectorInput {
            name: "Setor A".to_string(),
            product: Some("   ".to_string()),
            planting_date: None,
            harvest_eta: None,
            sensors: None,
            quantity_ml: None,
            repeat_every_hours: None,
            harvest_status: None,
            seedlings_planted: None,
            seedlings_harvested: None,
            observations: None,
        };
        assert_eq!(input.product(), DEFAULT_PRODUCT_LABEL);
    }
}
