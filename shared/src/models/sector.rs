//! Sector and irrigation-history models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::HarvestStatus;

/// Maximum number of irrigation events kept per sector
pub const IRRIGATION_HISTORY_CAP: usize = 10;

/// Number of history entries shown on the sector card
pub const IRRIGATION_HISTORY_DISPLAY: usize = 3;

/// Fallback crop label when none was given
pub const DEFAULT_PRODUCT_LABEL: &str = "Produto não definido";

/// Default dose per irrigation session, in millilitres
pub const DEFAULT_QUANTITY_ML: i32 = 250;

/// Default recurrence period, in hours
pub const DEFAULT_REPEAT_HOURS: i32 = 8;

/// One entry of a sector's irrigation history.
///
/// Field names match the persisted JSON layout (`last_irrigations`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationEvent {
    pub at: DateTime<Utc>,
    pub ml: i32,
    pub duration_min: i32,
}

/// A discrete planting area tracked for irrigation and harvest purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: Uuid,
    pub name: String,
    pub farm_id: Uuid,
    /// Crop label grown in this sector
    pub product: String,
    pub created_at: DateTime<Utc>,
    pub planting_date: Option<NaiveDate>,
    pub harvest_eta: Option<NaiveDate>,
    /// Bare sensor numbers; the store persists them as labelled strings
    pub sensors: Vec<u32>,
    /// Dose volume per irrigation session, in millilitres
    pub quantity_ml: i32,
    /// Recurrence period between scheduled sessions, in hours
    pub repeat_every_hours: i32,
    pub harvest_status: HarvestStatus,
    pub seedlings_planted: i32,
    pub seedlings_harvested: i32,
    pub observations: Option<String>,
    /// Most-recent-first, capped at [`IRRIGATION_HISTORY_CAP`]
    pub last_irrigations: Vec<IrrigationEvent>,
}

/// Front-insert an event into a history list, truncating to the cap.
pub fn push_irrigation_event(history: &mut Vec<IrrigationEvent>, event: IrrigationEvent) {
    history.insert(0, event);
    history.truncate(IRRIGATION_HISTORY_CAP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(minute: u32) -> IrrigationEvent {
        IrrigationEvent {
            at: Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap(),
            ml: 250,
            duration_min: 5,
        }
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut history = Vec::new();
        push_irrigation_event(&mut history, event(1));
        push_irrigation_event(&mut history, event(2));
        assert_eq!(history[0], event(2));
        assert_eq!(history[1], event(1));
    }

    #[test]
    fn history_truncates_at_cap() {
        let mut history = Vec::new();
        for minute in 0..15 {
            push_irrigation_event(&mut history, event(minute));
        }
        assert_eq!(history.len(), IRRIGATION_HISTORY_CAP);
        // newest entry survives, oldest entries are dropped
        assert_eq!(history[0], event(14));
        assert_eq!(history[IRRIGATION_HISTORY_CAP - 1], event(5));
    }
}
