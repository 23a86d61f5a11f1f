//! Sector runtime controller tests
//!
//! Exercises the ephemeral irrigation state machine end to end:
//! start → countdown → automatic completion, manual stop, and the
//! overlay merge with persisted sectors.

use chrono::{TimeZone, Utc};
use shared::{
    HarvestStatus, IrrigationState, RuntimeController, Sector, SessionSpec,
    DEFAULT_PRODUCT_LABEL, DEFAULT_QUANTITY_ML, DEFAULT_REPEAT_HOURS,
};
use uuid::Uuid;

fn persisted_sector(id: Uuid) -> Sector {
    Sector {
        id,
        name: "Setor Norte".to_string(),
        farm_id: Uuid::new_v4(),
        product: DEFAULT_PRODUCT_LABEL.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        planting_date: None,
        harvest_eta: None,
        sensors: vec![1, 2],
        quantity_ml: DEFAULT_QUANTITY_ML,
        repeat_every_hours: DEFAULT_REPEAT_HOURS,
        harvest_status: HarvestStatus::Seeded,
        seedlings_planted: 40,
        seedlings_harvested: 0,
        observations: None,
        last_irrigations: Vec::new(),
    }
}

#[test]
fn test_full_session_completes_without_manual_stop() {
    let mut controller = RuntimeController::new();
    let id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap();

    controller.start(id, SessionSpec::new(1, 250), now);
    assert!(controller.state(id).is_irrigating());
    assert!(controller.state(id).remaining_seconds().unwrap() > 0);

    let mut completed = Vec::new();
    for _ in 0..60 {
        completed.extend(controller.tick());
    }
    assert_eq!(completed, vec![id]);
    assert_eq!(controller.state(id), IrrigationState::Idle);
}

#[test]
fn test_stop_while_idle_is_a_no_op() {
    let mut controller = RuntimeController::new();
    let id = Uuid::new_v4();
    controller.stop(id);
    assert_eq!(controller.state(id), IrrigationState::Idle);
}

#[test]
fn test_merge_joins_overlay_onto_persisted_row() {
    let mut controller = RuntimeController::new();
    let id = Uuid::new_v4();
    let sector = persisted_sector(id);
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap();

    controller.start(id, SessionSpec::new(5, 300), now);
    controller.set_harvest_status(id, HarvestStatus::Growing);

    let view = controller.merge(&sector);
    assert!(view.is_irrigating);
    assert_eq!(view.remaining_seconds, Some(300));
    assert_eq!(view.sector.harvest_status, HarvestStatus::Growing);
    // the persisted row itself is untouched
    assert_eq!(sector.harvest_status, HarvestStatus::Seeded);
}

#[test]
fn test_merge_without_overlay_renders_idle() {
    let controller = RuntimeController::new();
    let sector = persisted_sector(Uuid::new_v4());
    let view = controller.merge(&sector);
    assert!(!view.is_irrigating);
    assert_eq!(view.remaining_seconds, None);
    assert!(view.automatic);
}

#[test]
fn test_reload_drops_overlays_of_deleted_sectors() {
    let mut controller = RuntimeController::new();
    let kept = Uuid::new_v4();
    let deleted = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap();

    controller.start(kept, SessionSpec::new(5, 250), now);
    controller.start(deleted, SessionSpec::new(5, 250), now);
    controller.retain_known(&[kept]);

    assert!(controller.state(kept).is_irrigating());
    assert_eq!(controller.state(deleted), IrrigationState::Idle);
}

#[test]
fn test_start_event_matches_session_spec() {
    let mut controller = RuntimeController::new();
    let id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap();

    let event = controller.start(id, SessionSpec::from_repeat_interval(8, 250), now);
    assert_eq!(event.at, now);
    assert_eq!(event.ml, 250);
    // legacy derivation: 8 "hours" reinterpreted as one 480-minute session
    assert_eq!(event.duration_min, 480);
}
