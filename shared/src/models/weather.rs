//! Weather data models

use serde::{Deserialize, Serialize};

/// Current conditions for a coordinate pair, derived per request and
/// never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    /// Relative air humidity, 0–100
    pub humidity_pct: f64,
    /// Current precipitation, never negative
    pub precipitation_mm: f64,
    /// Representative 0–10 cm soil temperature (weighted depth blend)
    pub soil_temperature_c: f64,
}

/// Advisory notes that accompany a recommendation. Zero or more may
/// apply; they are independent of each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    LowHumidity,
    HotSoil,
    PrecipitationDetected,
}

impl Advisory {
    pub fn message_en(&self) -> &'static str {
        match self {
            Advisory::LowHumidity => {
                "Low humidity detected. Consider increasing irrigation duration."
            }
            Advisory::HotSoil => {
                "Hot soil. Irrigate preferably in the early morning and late afternoon."
            }
            Advisory::PrecipitationDetected => {
                "Precipitation detected. Reduce irrigation proportionally."
            }
        }
    }

    pub fn message_pt(&self) -> &'static str {
        match self {
            Advisory::LowHumidity => {
                "Umidade baixa detectada. Considere aumentar a duração da irrigação."
            }
            Advisory::HotSoil => {
                "Solo quente. Irrigue preferencialmente no início da manhã e final da tarde."
            }
            Advisory::PrecipitationDetected => {
                "Precipitação detectada. Reduza a irrigação proporcionalmente."
            }
        }
    }
}

/// Output of the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationRecommendation {
    pub volume_mm_per_day: f64,
    /// Either 2 or 3
    pub applications_per_day: u8,
    pub per_application_mm: f64,
    /// Same application count as the 3/day tier, different advisory text
    pub high_need: bool,
    pub advisories: Vec<Advisory>,
}
