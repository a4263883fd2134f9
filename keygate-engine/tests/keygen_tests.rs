mod common;

use common::{create_request, date, engine, engine_parts, today};
use keygate_engine::{AllowAllAdmin, EngineConfig, EngineError, KeyFormat, LicenseEngine};
use keygate_store::{MemoryStore, TransactionalStore};
use keygate_types::FixedClock;
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn generated_ids_have_the_configured_shape() {
    let format = KeyFormat::default();
    let id = format.generate();
    let parts: Vec<&str> = id.as_str().split('-').collect();

    assert_eq!(parts.len(), 5);
    assert_eq!(parts[0], "DTF");
    assert_eq!(parts[4], "XYZ");
    for block in &parts[1..4] {
        assert_eq!(block.len(), 4);
        assert!(block
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}

#[test]
fn custom_format_is_respected() {
    let format = KeyFormat {
        prefix: "KG".to_string(),
        suffix: String::new(),
        blocks: 2,
        block_len: 6,
    };
    let id = format.generate();
    let parts: Vec<&str> = id.as_str().split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "KG");
    assert_eq!(parts[1].len(), 6);
    assert_eq!(parts[2].len(), 6);
}

#[test]
fn ten_thousand_generated_ids_are_distinct() {
    let format = KeyFormat::default();
    let ids: HashSet<String> = (0..10_000)
        .map(|_| format.generate().to_string())
        .collect();
    assert_eq!(ids.len(), 10_000);
}

#[tokio::test]
async fn created_licenses_get_distinct_ids() {
    let (engine, store) = engine_parts();

    let mut ids = HashSet::new();
    for _ in 0..1_000 {
        let created = engine
            .create_license("any", create_request(1, date(2027, 1, 1)))
            .await
            .unwrap();
        ids.insert(created.license_id.clone());
        // The record really landed under its id.
        assert!(store.get(&created.license_id).await.unwrap().is_some());
    }
    assert_eq!(ids.len(), 1_000);
}

#[tokio::test]
async fn exhausted_keyspace_is_a_defined_failure() {
    // A format with zero random blocks produces the same id every time,
    // so the second create can never find a free slot in the keyspace.
    let store = Arc::new(TransactionalStore::new(Arc::new(MemoryStore::new())));
    let engine = LicenseEngine::with_config(
        store,
        Arc::new(FixedClock::on(today())),
        Arc::new(AllowAllAdmin),
        EngineConfig {
            key_format: KeyFormat {
                prefix: "ONLY".to_string(),
                suffix: "KEY".to_string(),
                blocks: 0,
                block_len: 0,
            },
            max_keygen_attempts: 4,
            ..EngineConfig::default()
        },
    );

    engine
        .create_license("any", create_request(1, date(2027, 1, 1)))
        .await
        .unwrap();

    let err = engine
        .create_license("any", create_request(1, date(2027, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyspaceExhausted(4)));
}

#[tokio::test]
async fn collision_never_overwrites_an_existing_record() {
    let store = Arc::new(TransactionalStore::new(Arc::new(MemoryStore::new())));
    let engine = LicenseEngine::with_config(
        store.clone(),
        Arc::new(FixedClock::on(today())),
        Arc::new(AllowAllAdmin),
        EngineConfig {
            key_format: KeyFormat {
                prefix: "ONLY".to_string(),
                suffix: "KEY".to_string(),
                blocks: 0,
                block_len: 0,
            },
            max_keygen_attempts: 2,
            ..EngineConfig::default()
        },
    );

    let first = engine
        .create_license("any", create_request(3, date(2027, 1, 1)))
        .await
        .unwrap();
    engine.activate(first.license_id.as_str(), "machine-1").await.unwrap();

    // The colliding create fails without touching the stored record.
    engine
        .create_license("any", create_request(1, date(2028, 1, 1)))
        .await
        .unwrap_err();

    let record = store.get(&first.license_id).await.unwrap().unwrap();
    assert_eq!(record.max_activations, 3);
    assert_eq!(record.activations_used(), 1);
}

#[tokio::test]
async fn lifecycle_ids_do_not_collide_with_existing_records() {
    // Plain uniqueness across a busy store.
    let engine = engine();
    let mut ids = HashSet::new();
    for _ in 0..50 {
        let created = engine
            .create_license("any", create_request(1, date(2027, 1, 1)))
            .await
            .unwrap();
        assert!(ids.insert(created.license_id));
    }
}
