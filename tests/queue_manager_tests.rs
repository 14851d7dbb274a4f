//! Queue Manager Integration Tests
//!
//! Drives the public queue API end to end against a recording dispatcher and a
//! hand-driven clock.

mod common;

use common::{intake, TestQueue};
use std::collections::HashSet;
use std::sync::Arc;
use triage_queue::constants::events;
use triage_queue::{
    AlertEvent, NewPatient, PatientId, PatientStatus, QueueManager, RecordingDispatcher,
    TriageConfig, TriageError,
};

#[test]
fn adding_patients_grows_the_registry() {
    let queue = TestQueue::new();

    for (count, level) in [3, 1, 5, 2].into_iter().enumerate() {
        queue.manager.add_patient(intake("Patient", level)).unwrap();
        assert_eq!(queue.manager.get_all_patients().len(), count + 1);
    }

    let ids: Vec<u64> = queue
        .manager
        .get_all_patients()
        .iter()
        .map(|patient| patient.id.get())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn new_patients_start_waiting_without_timestamps() {
    let queue = TestQueue::new();
    let patient = queue
        .manager
        .add_patient(NewPatient::new("  Ada  ", 34, 2, " Chest pain "))
        .unwrap();

    assert_eq!(patient.name, "Ada");
    assert_eq!(patient.symptoms, "Chest pain");
    assert_eq!(patient.status, PatientStatus::Waiting);
    assert!(patient.treatment_started_at.is_none());
    assert!(patient.discharged_at.is_none());
    assert_eq!(queue.manager.get_patient(patient.id).unwrap(), patient);
}

#[test]
fn queue_orders_by_urgency_then_arrival() {
    let queue = TestQueue::new();
    for (name, level) in [("Five", 5), ("Three", 3), ("One", 1)] {
        queue.manager.add_patient(intake(name, level)).unwrap();
        queue.tick();
    }

    let levels: Vec<u8> = queue
        .manager
        .get_queue()
        .iter()
        .map(|patient| patient.urgency_level.get())
        .collect();
    assert_eq!(levels, vec![1, 3, 5]);
}

#[test]
fn equal_urgency_is_first_come_first_served() {
    let queue = TestQueue::new();
    let first = queue.manager.add_patient(intake("First", 3)).unwrap();
    queue.tick();
    let second = queue.manager.add_patient(intake("Second", 3)).unwrap();
    // Same instant: registration order decides
    let third = queue.manager.add_patient(intake("Third", 3)).unwrap();

    let order: Vec<PatientId> = queue.manager.get_queue().iter().map(|p| p.id).collect();
    assert_eq!(order, vec![first.id, second.id, third.id]);
}

#[test]
fn invalid_intake_is_rejected_with_every_violation() {
    let queue = TestQueue::new();
    let err = queue
        .manager
        .add_patient(NewPatient::new(" ", 130, 6, "ow"))
        .unwrap_err();

    assert!(matches!(err, TriageError::Validation(_)));
    assert_eq!(err.violations().len(), 4);
    assert!(queue.manager.get_all_patients().is_empty());
    assert!(queue.alerts.events().is_empty());
}

#[test]
fn treatment_is_refused_when_staff_are_busy() {
    let queue = TestQueue::with_staff(1);
    let first = queue.manager.add_patient(intake("First", 3)).unwrap();
    let second = queue.manager.add_patient(intake("Second", 3)).unwrap();

    let treated = queue.manager.start_treatment(first.id).unwrap();
    assert_eq!(treated.status, PatientStatus::Treating);
    assert!(treated.treatment_started_at.is_some());

    let err = queue.manager.start_treatment(second.id).unwrap_err();
    assert_eq!(
        err,
        TriageError::Capacity {
            currently_treating: 1,
            staff_available: 1,
        }
    );
    assert_eq!(
        queue.manager.get_patient(second.id).unwrap().status,
        PatientStatus::Waiting
    );
    assert_eq!(queue.manager.currently_treating(), 1);
}

#[test]
fn discharge_frees_a_treatment_slot() {
    let queue = TestQueue::with_staff(1);
    let first = queue.manager.add_patient(intake("First", 3)).unwrap();
    let second = queue.manager.add_patient(intake("Second", 3)).unwrap();

    queue.manager.start_treatment(first.id).unwrap();
    queue.tick();
    let discharged = queue.manager.discharge_patient(first.id).unwrap();
    assert_eq!(discharged.status, PatientStatus::Discharged);
    let started = discharged.treatment_started_at.expect("treatment start kept");
    let ended = discharged.discharged_at.expect("discharge stamped");
    assert!(ended > started);
    assert_eq!(queue.manager.currently_treating(), 0);

    queue.manager.start_treatment(second.id).unwrap();
    assert_eq!(queue.manager.currently_treating(), 1);
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let no_staff = TriageConfig {
        default_staff: 0,
        ..TriageConfig::default()
    };
    let err = QueueManager::new(&no_staff, Arc::new(RecordingDispatcher::new())).unwrap_err();
    assert!(matches!(err, TriageError::Configuration(_)));

    let mut oversized_wait = TriageConfig::default();
    oversized_wait.base_wait_minutes.level_5 = u64::MAX / 2;
    let err =
        QueueManager::new(&oversized_wait, Arc::new(RecordingDispatcher::new())).unwrap_err();
    assert!(err.to_string().contains("base_wait_minutes.level_5"));
}

#[test]
fn largest_base_wait_does_not_overflow_estimates() {
    let mut config = TriageConfig::default();
    config.base_wait_minutes.level_5 = triage_queue::constants::defaults::MAX_BASE_WAIT_MINUTES;
    let queue = TestQueue::with_config(config);

    for _ in 0..3 {
        queue.manager.add_patient(intake("Routine", 5)).unwrap();
    }
    let estimates = queue.manager.wait_time_estimates();
    // ceil(10080 * 3 / 5)
    assert!(estimates
        .iter()
        .all(|estimate| estimate.estimated_remaining_wait == 6048));
}

#[test]
fn double_discharge_is_an_invalid_state() {
    let queue = TestQueue::new();
    let patient = queue.manager.add_patient(intake("Ada", 2)).unwrap();
    queue.manager.start_treatment(patient.id).unwrap();
    queue.manager.discharge_patient(patient.id).unwrap();

    let err = queue.manager.discharge_patient(patient.id).unwrap_err();
    assert!(matches!(
        err,
        TriageError::InvalidState {
            status: PatientStatus::Discharged,
            ..
        }
    ));
    assert_eq!(queue.manager.currently_treating(), 0);
}

#[test]
fn treating_twice_is_an_invalid_state() {
    let queue = TestQueue::new();
    let patient = queue.manager.add_patient(intake("Ada", 2)).unwrap();
    queue.manager.start_treatment(patient.id).unwrap();

    let err = queue.manager.start_treatment(patient.id).unwrap_err();
    assert!(matches!(
        err,
        TriageError::InvalidState {
            status: PatientStatus::Treating,
            ..
        }
    ));
    assert_eq!(queue.manager.currently_treating(), 1);
}

#[test]
fn unknown_ids_are_not_found() {
    let queue = TestQueue::new();
    let missing = PatientId::new(99);

    assert_eq!(
        queue.manager.start_treatment(missing).unwrap_err(),
        TriageError::NotFound(missing)
    );
    assert_eq!(
        queue.manager.discharge_patient(missing).unwrap_err(),
        TriageError::NotFound(missing)
    );
    assert_eq!(
        queue.manager.get_patient(missing).unwrap_err(),
        TriageError::NotFound(missing)
    );
}

#[test]
fn full_lifecycle_round_trip() {
    let queue = TestQueue::new();
    let patient = queue.manager.add_patient(intake("Ada", 3)).unwrap();
    assert_eq!(queue.manager.get_queue().len(), 1);

    queue.manager.start_treatment(patient.id).unwrap();
    assert!(queue.manager.get_queue().is_empty());
    assert_eq!(
        queue.manager.patients_by_status(PatientStatus::Treating).len(),
        1
    );

    queue.tick();
    let discharged = queue.manager.discharge_patient(patient.id).unwrap();
    assert!(discharged.treatment_started_at.is_some() && discharged.discharged_at.is_some());
    assert_eq!(discharged.arrival_time, patient.arrival_time);
    assert_eq!(discharged.id, patient.id);

    let snapshot = queue.manager.snapshot();
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.discharged, 1);
    assert_eq!(snapshot.currently_treating, 0);
    assert_eq!(
        queue.manager.patients_by_status(PatientStatus::Discharged)[0].id,
        patient.id
    );
}

#[test]
fn discharge_from_waiting_leaves_treatment_count_alone() {
    let queue = TestQueue::new();
    let treated = queue.manager.add_patient(intake("Treated", 2)).unwrap();
    let walked_out = queue.manager.add_patient(intake("Left", 4)).unwrap();
    queue.manager.start_treatment(treated.id).unwrap();

    let patient = queue.manager.discharge_patient(walked_out.id).unwrap();
    assert_eq!(patient.status, PatientStatus::Discharged);
    assert!(patient.treatment_started_at.is_none());
    assert_eq!(queue.manager.currently_treating(), 1);
}

#[test]
fn discharge_from_waiting_can_be_disabled() {
    let queue = TestQueue::with_config(TriageConfig {
        allow_discharge_from_waiting: false,
        ..TriageConfig::default()
    });
    let patient = queue.manager.add_patient(intake("Ada", 4)).unwrap();

    let err = queue.manager.discharge_patient(patient.id).unwrap_err();
    assert!(matches!(
        err,
        TriageError::InvalidState {
            status: PatientStatus::Waiting,
            ..
        }
    ));
    assert_eq!(
        queue.manager.get_patient(patient.id).unwrap().status,
        PatientStatus::Waiting
    );
}

#[test]
fn critical_arrival_raises_exactly_two_alerts() {
    let queue = TestQueue::new();
    let patient = queue
        .manager
        .add_patient(NewPatient::new("Ada", 60, 1, "Cardiac arrest"))
        .unwrap();

    assert_eq!(queue.alerts.count(events::CRITICAL_PATIENT), 1);
    assert_eq!(queue.alerts.count(events::TREATMENT_INTERRUPT), 1);

    match queue.alerts.last(events::CRITICAL_PATIENT) {
        Some(AlertEvent::CriticalPatient { patient: alert, .. }) => {
            assert_eq!(alert.id, patient.id);
            assert_eq!(alert.symptoms, "Cardiac arrest");
        }
        other => panic!("expected critical-patient alert, got {other:?}"),
    }

    queue.manager.add_patient(intake("Routine", 2)).unwrap();
    assert_eq!(queue.alerts.count(events::CRITICAL_PATIENT), 1);
    assert_eq!(queue.alerts.count(events::TREATMENT_INTERRUPT), 1);
}

#[test]
fn critical_arrival_does_not_preempt_treatment() {
    let queue = TestQueue::with_staff(1);
    let treated = queue.manager.add_patient(intake("Treated", 4)).unwrap();
    queue.manager.start_treatment(treated.id).unwrap();

    let critical = queue.manager.add_patient(intake("Critical", 1)).unwrap();
    assert_eq!(
        queue.manager.get_patient(treated.id).unwrap().status,
        PatientStatus::Treating
    );
    assert_eq!(queue.manager.get_queue()[0].id, critical.id);
}

#[test]
fn staffing_alert_fires_only_above_threshold() {
    let queue = TestQueue::with_staff(2);

    for _ in 0..5 {
        queue.manager.add_patient(intake("Patient", 4)).unwrap();
    }
    assert_eq!(queue.alerts.count(events::STAFFING_ALERT), 0);

    for _ in 0..5 {
        queue.manager.add_patient(intake("Patient", 4)).unwrap();
    }
    // Waiting 7..=10 against 2 staff exceeds 3.0
    assert_eq!(queue.alerts.count(events::STAFFING_ALERT), 4);

    match queue.alerts.last(events::STAFFING_ALERT) {
        Some(AlertEvent::StaffingAlert { details, .. }) => {
            assert_eq!(details.ratio, 5.0);
            assert_eq!(details.waiting_patients, 10);
            assert_eq!(details.available_staff, 2);
        }
        other => panic!("expected staffing alert, got {other:?}"),
    }
}

#[test]
fn raising_staff_clears_the_staffing_alert() {
    let queue = TestQueue::with_staff(2);
    for _ in 0..10 {
        queue.manager.add_patient(intake("Patient", 4)).unwrap();
    }

    queue.alerts.clear();
    queue.manager.update_staffing(4).unwrap();
    assert_eq!(queue.manager.staff_available(), 4);
    assert_eq!(queue.alerts.count(events::STAFFING_ALERT), 0);

    queue.manager.update_staffing(1).unwrap();
    assert_eq!(queue.alerts.count(events::STAFFING_ALERT), 1);
}

#[test]
fn zero_staff_is_rejected() {
    let queue = TestQueue::with_staff(3);
    let err = queue.manager.update_staffing(0).unwrap_err();

    assert!(matches!(err, TriageError::Validation(_)));
    assert_eq!(queue.manager.staff_available(), 3);
}

#[test]
fn lowering_staff_below_treating_blocks_new_treatment() {
    let queue = TestQueue::with_staff(3);
    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(queue.manager.add_patient(intake("Patient", 3)).unwrap().id);
    }
    for id in &ids[..3] {
        queue.manager.start_treatment(*id).unwrap();
    }

    queue.manager.update_staffing(1).unwrap();
    assert_eq!(queue.manager.currently_treating(), 3);
    assert!(matches!(
        queue.manager.start_treatment(ids[3]),
        Err(TriageError::Capacity { .. })
    ));

    for id in &ids[..2] {
        queue.manager.discharge_patient(*id).unwrap();
    }
    assert!(matches!(
        queue.manager.start_treatment(ids[3]),
        Err(TriageError::Capacity { .. })
    ));

    queue.manager.discharge_patient(ids[2]).unwrap();
    queue.manager.start_treatment(ids[3]).unwrap();
}

#[test]
fn every_mutation_publishes_wait_times() {
    let queue = TestQueue::new();
    let patient = queue.manager.add_patient(intake("Ada", 3)).unwrap();
    queue.manager.start_treatment(patient.id).unwrap();
    queue.manager.discharge_patient(patient.id).unwrap();
    queue.manager.update_staffing(6).unwrap();

    assert_eq!(queue.alerts.count(events::WAIT_TIME_UPDATE), 4);
}

#[test]
fn wait_time_estimates_scale_with_load() {
    let queue = TestQueue::with_staff(5);
    for _ in 0..3 {
        queue.manager.add_patient(intake("Patient", 3)).unwrap();
    }
    queue
        .clock
        .advance(chrono::Duration::minutes(10) + chrono::Duration::seconds(30));

    let estimates = queue.manager.wait_time_estimates();
    assert_eq!(estimates.len(), 3);
    for estimate in &estimates {
        // ceil(30 * 3 / 5)
        assert_eq!(estimate.estimated_remaining_wait, 18);
        assert_eq!(estimate.current_wait_time, 10);
    }

    queue.alerts.clear();
    let refreshed = queue.manager.refresh_wait_times();
    assert_eq!(refreshed, estimates);
    match queue.alerts.last(events::WAIT_TIME_UPDATE) {
        Some(AlertEvent::WaitTimeUpdate { wait_times, .. }) => assert_eq!(wait_times, estimates),
        other => panic!("expected wait-time update, got {other:?}"),
    }
}

#[test]
fn failing_dispatcher_never_fails_operations() {
    let queue = TestQueue::failing();
    let patient = queue.manager.add_patient(intake("Critical", 1)).unwrap();
    queue.manager.start_treatment(patient.id).unwrap();
    queue.manager.update_staffing(2).unwrap();
    queue.manager.discharge_patient(patient.id).unwrap();

    assert_eq!(queue.manager.snapshot().discharged, 1);
    assert!(queue.alerts.count(events::CRITICAL_PATIENT) >= 1);
}

#[test]
fn concurrent_admissions_get_unique_ids() {
    let manager = Arc::new(
        QueueManager::new(
            &TriageConfig::default(),
            Arc::new(RecordingDispatcher::new()),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|thread| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                (0..25)
                    .map(|n| {
                        manager
                            .add_patient(intake(&format!("T{thread} P{n}"), (n % 5) + 1))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(ids.len(), 200);
    assert_eq!(manager.get_all_patients().len(), 200);
}

#[test]
fn concurrent_treatment_never_exceeds_staff() {
    let manager = Arc::new(
        QueueManager::new(
            &TriageConfig {
                default_staff: 4,
                ..TriageConfig::default()
            },
            Arc::new(RecordingDispatcher::new()),
        )
        .unwrap(),
    );
    let ids: Vec<PatientId> = (0..40)
        .map(|_| manager.add_patient(intake("Patient", 3)).unwrap().id)
        .collect();

    let handles: Vec<_> = ids
        .chunks(10)
        .map(|chunk| {
            let manager = Arc::clone(&manager);
            let chunk = chunk.to_vec();
            std::thread::spawn(move || {
                chunk
                    .into_iter()
                    .filter(|id| manager.start_treatment(*id).is_ok())
                    .count()
            })
        })
        .collect();

    let started: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(started, 4);
    assert_eq!(manager.currently_treating(), 4);
    assert_eq!(manager.patients_by_status(PatientStatus::Treating).len(), 4);
}
