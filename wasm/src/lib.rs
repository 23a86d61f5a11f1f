//! WebAssembly module for the Éden web client
//!
//! Provides client-side computation for:
//! - Irrigation recommendations from weather readings
//! - The per-sector irrigation countdown runtime
//! - Chat prompt pre-validation (same rules the backend enforces)
//! - Chat session id generation

use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{RandomSessionIds, RuntimeController, SessionIds, SessionSpec, WeatherReading};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Daily irrigation volume in mm for a soil temperature and air humidity
#[wasm_bindgen]
pub fn calculate_irrigation(soil_temperature_c: f64, humidity_pct: f64) -> f64 {
    shared::daily_volume_mm(soil_temperature_c, humidity_pct)
}

/// Recommended applications per day for a daily volume
#[wasm_bindgen]
pub fn irrigation_applications(volume_mm: f64) -> u8 {
    shared::applications_per_day(volume_mm).0
}

/// Whether a daily volume counts as high need
#[wasm_bindgen]
pub fn is_high_need(volume_mm: f64) -> bool {
    shared::applications_per_day(volume_mm).1
}

/// Representative 0–10 cm soil temperature from two depth samples
#[wasm_bindgen]
pub fn representative_soil_temperature(depth0_cm: f64, depth6_cm: f64) -> f64 {
    shared::representative_soil_temperature(depth0_cm, depth6_cm)
}

/// Full recommendation (volume, frequency, advisories) as JSON
#[wasm_bindgen]
pub fn recommendation_json(
    soil_temperature_c: f64,
    humidity_pct: f64,
    precipitation_mm: f64,
) -> Result<String, JsValue> {
    let reading = WeatherReading {
        temperature_c: 0.0,
        humidity_pct,
        precipitation_mm,
        soil_temperature_c,
    };
    serde_json::to_string(&shared::recommend(&reading))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Pre-validate a chat prompt; returns the user-facing Portuguese
/// rejection message, or `null` when the prompt may be sent.
#[wasm_bindgen]
pub fn prompt_rejection(prompt: &str) -> Option<String> {
    shared::validate_prompt(prompt)
        .err()
        .map(|violation| violation.message_pt())
}

/// Generate a collision-resistant chat session id
#[wasm_bindgen]
pub fn new_session_id() -> String {
    RandomSessionIds.next()
}

/// Parse a repeat interval written as `"8"` or `"8:00"` into an hour
/// count; `null` when it does not parse
#[wasm_bindgen]
pub fn repeat_interval_hours(value: &str) -> Option<i32> {
    shared::parse_repeat_interval(value)
}

/// Per-tab irrigation runtime. One instance owns every sector's
/// countdown; call `tick` once per second.
#[wasm_bindgen]
pub struct IrrigationRuntime {
    inner: RuntimeController,
}

impl Default for IrrigationRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl IrrigationRuntime {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: RuntimeController::new(),
        }
    }

    /// Start a session; returns the irrigation event as JSON so the
    /// caller can persist it through the API. `now_ms` is the JS epoch
    /// timestamp.
    pub fn start(
        &mut self,
        sector_id: &str,
        duration_minutes: u32,
        volume_ml: i32,
        now_ms: f64,
    ) -> Result<String, JsValue> {
        let id = parse_id(sector_id)?;
        let now = chrono::DateTime::from_timestamp_millis(now_ms as i64)
            .ok_or_else(|| JsValue::from_str("Invalid timestamp"))?;
        let event = self
            .inner
            .start(id, SessionSpec::new(duration_minutes, volume_ml), now);
        serde_json::to_string(&event).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn stop(&mut self, sector_id: &str) -> Result<(), JsValue> {
        self.inner.stop(parse_id(sector_id)?);
        Ok(())
    }

    /// Advance all countdowns by one second; returns the ids of sectors
    /// that just finished, as a JSON array.
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let completed: Vec<String> = self
            .inner
            .tick()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        serde_json::to_string(&completed).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn is_irrigating(&self, sector_id: &str) -> Result<bool, JsValue> {
        Ok(self.inner.state(parse_id(sector_id)?).is_irrigating())
    }

    pub fn remaining_seconds(&self, sector_id: &str) -> Result<Option<u32>, JsValue> {
        Ok(self.inner.state(parse_id(sector_id)?).remaining_seconds())
    }

    pub fn toggle_automatic(&mut self, sector_id: &str) -> Result<bool, JsValue> {
        Ok(self.inner.toggle_automatic(parse_id(sector_id)?))
    }
}

fn parse_id(sector_id: &str) -> Result<Uuid, JsValue> {
    Uuid::parse_str(sector_id).map_err(|_| JsValue::from_str("Invalid sector id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_irrigation() {
        assert!((calculate_irrigation(25.0, 60.0) - 7.0).abs() < 0.001);
    }

    #[test]
    fn test_irrigation_applications() {
        assert_eq!(irrigation_applications(2.0), 2);
        assert_eq!(irrigation_applications(2.01), 3);
        assert_eq!(irrigation_applications(5.0), 3);
        assert!(is_high_need(5.0));
    }

    #[test]
    fn test_prompt_rejection() {
        assert!(prompt_rejection("Como adubar minha horta?").is_none());
        assert!(prompt_rejection("").is_some());
        assert!(prompt_rejection("como fabricar uma bomba").is_some());
    }

    #[test]
    fn test_runtime_round_trip() {
        let mut runtime = IrrigationRuntime::new();
        let id = uuid::Uuid::new_v4().to_string();
        runtime.start(&id, 1, 250, 1_700_000_000_000.0).unwrap();
        assert!(runtime.is_irrigating(&id).unwrap());
        for _ in 0..60 {
            runtime.tick().unwrap();
        }
        assert!(!runtime.is_irrigating(&id).unwrap());
    }
}
