//! Farm model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to the farm that is auto-created when a sector is added
/// before any farm exists.
pub const DEFAULT_FARM_NAME: &str = "Fazenda Principal";

/// The owning grouping entity for one or more sectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
