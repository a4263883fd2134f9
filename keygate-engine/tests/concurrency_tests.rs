//! Races against the slot limit.
//!
//! These tests drive real task-level concurrency through the engine's
//! transaction path; the per-license critical section is what keeps every
//! interleaving inside the invariants.

mod common;

use common::{date, engine, seeded_license};
use keygate_engine::{ActivateOutcome, LicenseEngine, VerifyOutcome};
use std::sync::Arc;

async fn race_activations(
    engine: Arc<LicenseEngine>,
    id: &str,
    hwids: Vec<String>,
) -> Vec<ActivateOutcome> {
    let mut tasks = Vec::new();
    for hwid in hwids {
        let engine = engine.clone();
        let id = id.to_string();
        tasks.push(tokio::spawn(async move {
            engine.activate(&id, &hwid).await.unwrap()
        }));
    }
    let mut outcomes = Vec::new();
    for task in tasks {
        outcomes.push(task.await.unwrap());
    }
    outcomes
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn two_machines_race_for_one_slot() {
    let engine = Arc::new(engine());
    let id = seeded_license(&engine, 1, date(2027, 1, 1)).await;

    let outcomes = race_activations(
        engine.clone(),
        &id,
        vec!["machine-a".to_string(), "machine-b".to_string()],
    )
    .await;

    let activated = outcomes
        .iter()
        .filter(|o| matches!(o, ActivateOutcome::Activated { .. }))
        .count();
    let refused = outcomes
        .iter()
        .filter(|o| matches!(o, ActivateOutcome::LimitReached))
        .count();
    assert_eq!((activated, refused), (1, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_machines_race_for_few_slots() {
    const MACHINES: usize = 24;
    const SLOTS: u32 = 5;

    let engine = Arc::new(engine());
    let id = seeded_license(&engine, SLOTS, date(2027, 1, 1)).await;

    let hwids: Vec<String> = (0..MACHINES).map(|n| format!("machine-{n}")).collect();
    let outcomes = race_activations(engine.clone(), &id, hwids).await;

    let activated = outcomes
        .iter()
        .filter(|o| matches!(o, ActivateOutcome::Activated { .. }))
        .count();
    assert_eq!(activated, SLOTS as usize);
    assert_eq!(outcomes.len() - activated, MACHINES - SLOTS as usize);

    // The stored record agrees and holds no duplicates.
    match engine.verify(&id, "machine-0").await.unwrap() {
        VerifyOutcome::Valid { summary, .. } => {
            assert_eq!(summary.activations_used, SLOTS);
            let mut hwids: Vec<_> =
                summary.activated_hwids.iter().map(|h| h.as_str()).collect();
            hwids.sort_unstable();
            hwids.dedup();
            assert_eq!(hwids.len(), SLOTS as usize);
        }
        other => panic!("expected valid verify, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn same_machine_racing_itself_takes_one_slot() {
    let engine = Arc::new(engine());
    let id = seeded_license(&engine, 3, date(2027, 1, 1)).await;

    let hwids = vec!["machine-a".to_string(); 16];
    let outcomes = race_activations(engine.clone(), &id, hwids).await;

    let fresh = outcomes
        .iter()
        .filter(|o| matches!(o, ActivateOutcome::Activated { .. }))
        .count();
    let repeats = outcomes
        .iter()
        .filter(|o| matches!(o, ActivateOutcome::AlreadyActive { .. }))
        .count();
    assert_eq!(fresh, 1);
    assert_eq!(repeats, 15);

    match engine.verify(&id, "machine-a").await.unwrap() {
        VerifyOutcome::Valid { summary, .. } => assert_eq!(summary.activations_used, 1),
        other => panic!("expected valid verify, got {other:?}"),
    }
}
