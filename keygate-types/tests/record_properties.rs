//! Property-based tests for the slot invariants.
//!
//! For any interleaving of claim and release operations:
//! - the slot list never exceeds `max_activations`
//! - no hardware id ever appears twice

use chrono::{NaiveDate, Utc};
use keygate_types::{HardwareId, LicenseId, LicenseRecord, SlotClaim};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum SlotOp {
    Claim(String),
    Release(String),
}

fn hwid_strategy() -> impl Strategy<Value = String> {
    // A small pool so claims and releases actually collide.
    prop::sample::select(vec!["a", "b", "c", "d", "e", "f", "g", "h"])
        .prop_map(str::to_string)
}

fn op_strategy() -> impl Strategy<Value = SlotOp> {
    prop_oneof![
        hwid_strategy().prop_map(SlotOp::Claim),
        hwid_strategy().prop_map(SlotOp::Release),
    ]
}

proptest! {
    #[test]
    fn slot_invariants_hold_under_any_op_sequence(
        max in 1u32..5,
        ops in prop::collection::vec(op_strategy(), 0..50),
    ) {
        let mut record = LicenseRecord::new(
            LicenseId::new("DTF-PROP-PROP-PROP-XYZ").unwrap(),
            "Prop Customer",
            "Product",
            "1.0.0",
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            max,
            Utc::now(),
        );

        for op in ops {
            match op {
                SlotOp::Claim(h) => {
                    record.claim_slot(HardwareId::new(&h).unwrap());
                }
                SlotOp::Release(h) => {
                    record.release_slot(&HardwareId::new(&h).unwrap());
                }
            }

            prop_assert!(record.activations_used() <= max);
            let distinct: HashSet<&str> =
                record.activated_hwids().iter().map(|h| h.as_str()).collect();
            prop_assert_eq!(distinct.len(), record.activated_hwids().len());
        }
    }

    #[test]
    fn claim_reports_match_state(
        max in 1u32..4,
        hwids in prop::collection::vec(hwid_strategy(), 1..20),
    ) {
        let mut record = LicenseRecord::new(
            LicenseId::new("DTF-PROP-PROP-PROP-XYZ").unwrap(),
            "Prop Customer",
            "Product",
            "1.0.0",
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            max,
            Utc::now(),
        );

        for h in hwids {
            let held_before = record.holds(&HardwareId::new(&h).unwrap());
            let full_before = record.activations_used() >= max;
            let claim = record.claim_slot(HardwareId::new(&h).unwrap());
            match claim {
                SlotClaim::AlreadyHeld => prop_assert!(held_before),
                SlotClaim::Claimed => prop_assert!(!held_before && !full_before),
                SlotClaim::LimitReached => prop_assert!(!held_before && full_before),
            }
        }
    }
}
