//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Crop lifecycle stage of a sector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HarvestStatus {
    #[default]
    Seeded,
    Growing,
    Ready,
    Harvested,
    Paused,
}

impl HarvestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestStatus::Seeded => "seeded",
            HarvestStatus::Growing => "growing",
            HarvestStatus::Ready => "ready",
            HarvestStatus::Harvested => "harvested",
            HarvestStatus::Paused => "paused",
        }
    }

    /// Parse a stored status label. Unknown labels fall back to the
    /// creation default, matching the storage column default.
    pub fn from_db(value: &str) -> Self {
        match value {
            "growing" => HarvestStatus::Growing,
            "ready" => HarvestStatus::Ready,
            "harvested" => HarvestStatus::Harvested,
            "paused" => HarvestStatus::Paused,
            _ => HarvestStatus::Seeded,
        }
    }
}

/// Author of a chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "model" => ChatRole::Model,
            _ => ChatRole::User,
        }
    }
}
