//! Sector irrigation runtime
//!
//! Tracks ephemeral, non-persisted irrigation state per sector,
//! independent of the lifecycle store. Persisted rows and runtime
//! overlays are two separate maps joined by sector id at render time;
//! persisted objects are never mutated in place.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{push_irrigation_event, IrrigationEvent, Sector};
use crate::types::HarvestStatus;

/// Watering parameters for one irrigation session.
///
/// The session duration is deliberately a separate quantity from the
/// sector's persisted `repeat_every_hours` recurrence period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSpec {
    pub duration_minutes: u32,
    pub volume_ml: i32,
}

impl SessionSpec {
    pub fn new(duration_minutes: u32, volume_ml: i32) -> Self {
        Self {
            duration_minutes,
            volume_ml,
        }
    }

    /// Legacy derivation: treat the recurrence period as the length of a
    /// single session, the behavior the product shipped with.
    pub fn from_repeat_interval(repeat_every_hours: i32, volume_ml: i32) -> Self {
        Self {
            duration_minutes: repeat_every_hours.max(0) as u32 * 60,
            volume_ml,
        }
    }
}

/// Irrigation state of one sector. An irrigating sector always carries
/// its countdown; the two cannot diverge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IrrigationState {
    #[default]
    Idle,
    Irrigating {
        started_at: DateTime<Utc>,
        total_seconds: u32,
        remaining_seconds: u32,
    },
}

impl IrrigationState {
    pub fn is_irrigating(&self) -> bool {
        matches!(self, IrrigationState::Irrigating { .. })
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        match self {
            IrrigationState::Idle => None,
            IrrigationState::Irrigating {
                remaining_seconds, ..
            } => Some(*remaining_seconds),
        }
    }
}

/// Ephemeral overlay for one sector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRuntime {
    pub state: IrrigationState,
    pub automatic: bool,
    /// Harvest-status override not yet written back to the store
    pub harvest_status: Option<HarvestStatus>,
    /// Tab-local session log, most-recent-first, bounded like the
    /// persisted history
    pub session_events: Vec<IrrigationEvent>,
}

impl Default for SectorRuntime {
    fn default() -> Self {
        Self {
            state: IrrigationState::Idle,
            automatic: true,
            harvest_status: None,
            session_events: Vec::new(),
        }
    }
}

/// A persisted sector merged with its runtime overlay for display
#[derive(Debug, Clone, Serialize)]
pub struct SectorView {
    #[serde(flatten)]
    pub sector: Sector,
    pub is_irrigating: bool,
    pub remaining_seconds: Option<u32>,
    pub automatic: bool,
}

/// Process-local controller over all sector overlays.
///
/// A single clock drives every countdown: one [`RuntimeController::tick`]
/// call corresponds to one elapsed second and updates all irrigating
/// sectors within the call.
#[derive(Debug, Default)]
pub struct RuntimeController {
    sectors: HashMap<Uuid, SectorRuntime>,
}

impl RuntimeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an irrigation session. Last-write-wins: starting while a
    /// session is already running restarts the countdown. Returns the
    /// event record so the caller can persist it through the store.
    pub fn start(
        &mut self,
        sector_id: Uuid,
        session: SessionSpec,
        now: DateTime<Utc>,
    ) -> IrrigationEvent {
        let event = IrrigationEvent {
            at: now,
            ml: session.volume_ml,
            duration_min: session.duration_minutes as i32,
        };
        let runtime = self.sectors.entry(sector_id).or_default();
        let total_seconds = session.duration_minutes * 60;
        runtime.state = IrrigationState::Irrigating {
            started_at: now,
            total_seconds,
            remaining_seconds: total_seconds,
        };
        push_irrigation_event(&mut runtime.session_events, event.clone());
        event
    }

    /// Manually end a session, regardless of remaining time. A no-op on
    /// idle or unknown sectors.
    pub fn stop(&mut self, sector_id: Uuid) {
        if let Some(runtime) = self.sectors.get_mut(&sector_id) {
            runtime.state = IrrigationState::Idle;
        }
    }

    /// Advance all countdowns by one second. Sectors reaching zero go
    /// back to idle; their ids are returned so the caller can notify.
    pub fn tick(&mut self) -> Vec<Uuid> {
        let mut completed = Vec::new();
        for (id, runtime) in self.sectors.iter_mut() {
            if let IrrigationState::Irrigating {
                started_at,
                total_seconds,
                remaining_seconds,
            } = runtime.state
            {
                let remaining = remaining_seconds.saturating_sub(1);
                if remaining == 0 {
                    runtime.state = IrrigationState::Idle;
                    completed.push(*id);
                } else {
                    runtime.state = IrrigationState::Irrigating {
                        started_at,
                        total_seconds,
                        remaining_seconds: remaining,
                    };
                }
            }
        }
        completed
    }

    pub fn set_automatic(&mut self, sector_id: Uuid, automatic: bool) {
        self.sectors.entry(sector_id).or_default().automatic = automatic;
    }

    /// Flip the automatic-mode flag and return the new value.
    pub fn toggle_automatic(&mut self, sector_id: Uuid) -> bool {
        let runtime = self.sectors.entry(sector_id).or_default();
        runtime.automatic = !runtime.automatic;
        runtime.automatic
    }

    pub fn set_harvest_status(&mut self, sector_id: Uuid, status: HarvestStatus) {
        self.sectors.entry(sector_id).or_default().harvest_status = Some(status);
    }

    pub fn state(&self, sector_id: Uuid) -> IrrigationState {
        self.sectors
            .get(&sector_id)
            .map(|r| r.state)
            .unwrap_or_default()
    }

    pub fn overlay(&self, sector_id: Uuid) -> Option<&SectorRuntime> {
        self.sectors.get(&sector_id)
    }

    /// Join a persisted sector with its overlay. Sectors without an
    /// overlay render idle and automatic.
    pub fn merge(&self, sector: &Sector) -> SectorView {
        let runtime = self.sectors.get(&sector.id);
        let mut merged = sector.clone();
        if let Some(status) = runtime.and_then(|r| r.harvest_status) {
            merged.harvest_status = status;
        }
        SectorView {
            is_irrigating: runtime.map(|r| r.state.is_irrigating()).unwrap_or(false),
            remaining_seconds: runtime.and_then(|r| r.state.remaining_seconds()),
            automatic: runtime.map(|r| r.automatic).unwrap_or(true),
            sector: merged,
        }
    }

    /// Drop overlays for sectors that no longer exist in the store,
    /// called after each reload.
    pub fn retain_known(&mut self, known: &[Uuid]) {
        self.sectors.retain(|id, _| known.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn start_sets_irrigating_with_positive_countdown() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        controller.start(id, SessionSpec::new(2, 250), now());
        assert!(controller.state(id).is_irrigating());
        assert_eq!(controller.state(id).remaining_seconds(), Some(120));
    }

    #[test]
    fn countdown_reaches_idle_without_manual_stop() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        controller.start(id, SessionSpec::new(1, 250), now());
        for _ in 0..59 {
            assert!(controller.tick().is_empty());
        }
        assert_eq!(controller.tick(), vec![id]);
        assert_eq!(controller.state(id), IrrigationState::Idle);
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        controller.stop(id);
        assert_eq!(controller.state(id), IrrigationState::Idle);
    }

    #[test]
    fn stop_clears_remaining_time() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        controller.start(id, SessionSpec::new(30, 250), now());
        controller.stop(id);
        assert_eq!(controller.state(id), IrrigationState::Idle);
        assert_eq!(controller.state(id).remaining_seconds(), None);
    }

    #[test]
    fn restart_is_last_write_wins() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        controller.start(id, SessionSpec::new(10, 250), now());
        controller.tick();
        controller.start(id, SessionSpec::new(5, 250), now());
        assert_eq!(controller.state(id).remaining_seconds(), Some(300));
    }

    #[test]
    fn tick_updates_every_irrigating_sector() {
        let mut controller = RuntimeController::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        controller.start(a, SessionSpec::new(1, 250), now());
        controller.start(b, SessionSpec::new(2, 300), now());
        controller.tick();
        assert_eq!(controller.state(a).remaining_seconds(), Some(59));
        assert_eq!(controller.state(b).remaining_seconds(), Some(119));
    }

    #[test]
    fn start_records_session_event() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        let event = controller.start(id, SessionSpec::new(5, 300), now());
        assert_eq!(event.ml, 300);
        assert_eq!(event.duration_min, 5);
        assert_eq!(controller.overlay(id).unwrap().session_events[0], event);
    }

    #[test]
    fn legacy_session_spec_reinterprets_repeat_interval() {
        let spec = SessionSpec::from_repeat_interval(8, 250);
        assert_eq!(spec.duration_minutes, 480);
    }

    #[test]
    fn toggle_automatic_flips_default_on() {
        let mut controller = RuntimeController::new();
        let id = Uuid::new_v4();
        assert!(!controller.toggle_automatic(id));
        assert!(controller.toggle_automatic(id));
    }
}
