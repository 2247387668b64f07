// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adversarial update tests: every rejected rewrite must leave the stored
//! record byte-for-byte unchanged.

use importer_core::{LedgerError, ProfileUpdate};
use importer_dry_tests::{
    test_registry, violation_history_json, violations, ViolationBuilder, SAMPLE_IMPORTER,
};

#[test]
fn backdating_registration_date_is_rejected() {
    let (mut registry, store) = test_registry();
    let profile = registry.register(SAMPLE_IMPORTER, 7, 1, 0, 20).expect("register");
    let before = store.snapshot();

    let err = registry
        .update(
            SAMPLE_IMPORTER,
            ProfileUpdate::none().with_registration_date("2020-01-01T00:00:00Z"),
        )
        .expect_err("backdate must be rejected");

    match err {
        LedgerError::ImmutableField {
            ref current,
            ref attempted,
            ..
        } => {
            assert_eq!(current, &profile.registration_date);
            assert_eq!(attempted, "2020-01-01T00:00:00Z");
        }
        ref other => unreachable!("unexpected error: {other}"),
    }
    assert!(err.is_anti_fraud());
    assert_eq!(store.snapshot(), before);
    assert_eq!(
        registry
            .get_importer(SAMPLE_IMPORTER)
            .expect("get")
            .registration_date,
        profile.registration_date
    );
}

#[test]
fn forward_dating_registration_date_is_rejected() {
    let (mut registry, store) = test_registry();
    registry.register("29ZZZZZ9999Z1Z0", 3, 0, 2, 5).expect("register");
    let before = store.snapshot();

    let err = registry
        .update_raw("29ZZZZZ9999Z1Z0", "2030-12-31T23:59:59Z", "")
        .expect_err("forward-date must be rejected");
    assert!(matches!(err, LedgerError::ImmutableField { .. }));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn same_or_empty_registration_date_is_accepted_and_refreshes_last_updated() {
    let (mut registry, _store) = test_registry();
    let profile = registry.register("07DDDDD3333D1Z4", 1, 0, 0, 0).expect("register");

    let same = registry
        .update_raw("07DDDDD3333D1Z4", &profile.registration_date, "")
        .expect("identical date accepted");
    assert_eq!(same.registration_date, profile.registration_date);
    assert_ne!(same.last_updated, profile.last_updated);

    let empty = registry
        .update("07DDDDD3333D1Z4", ProfileUpdate::none())
        .expect("no-op update accepted");
    assert_ne!(empty.last_updated, same.last_updated);
    assert_eq!(empty.violation_history, profile.violation_history);
}

#[test]
fn dropping_a_violation_is_shrinkage() {
    let (mut registry, store) = test_registry();
    registry.register("33AAAAA0000A1Z1", 5, 1, 0, 10).expect("register");
    registry
        .add_violation("33AAAAA0000A1Z1", "V001", "Undeclared electronics", 3)
        .expect("violation 1");
    registry
        .add_violation("33AAAAA0000A1Z1", "V002", "Counterfeit documents", 5)
        .expect("violation 2");
    let before = store.snapshot();

    let shortened = violation_history_json(&violations(&["V001"]));
    let err = registry
        .update_raw("33AAAAA0000A1Z1", "", &shortened)
        .expect_err("shrinkage must be rejected");
    assert!(matches!(
        err,
        LedgerError::Shrinkage {
            current: 2,
            attempted: 1,
            ..
        }
    ));
    assert_eq!(store.snapshot(), before);
    assert_eq!(
        registry
            .get_importer("33AAAAA0000A1Z1")
            .expect("get")
            .violation_history
            .len(),
        2
    );
}

#[test]
fn clearing_history_is_shrinkage() {
    let (mut registry, store) = test_registry();
    registry.register("07BBBBB1111B1Z2", 2, 0, 0, 3).expect("register");
    registry
        .add_violation("07BBBBB1111B1Z2", "V010", "Smuggling attempt", 5)
        .expect("violation");
    let before = store.snapshot();

    assert!(matches!(
        registry.update_raw("07BBBBB1111B1Z2", "", "[]"),
        Err(LedgerError::Shrinkage { .. })
    ));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn rewriting_an_existing_violation_id_is_tamper() {
    let (mut registry, store) = test_registry();
    registry.register("33CCCCC2222C1Z3", 4, 1, 0, 8).expect("register");
    registry
        .add_violation("33CCCCC2222C1Z3", "V020", "Original violation", 3)
        .expect("violation");
    let before = store.snapshot();

    let tampered = vec![ViolationBuilder::new("V999")
        .description("Tampered record")
        .build()];
    let err = registry
        .update(
            "33CCCCC2222C1Z3",
            ProfileUpdate::none().with_violation_history(tampered),
        )
        .expect_err("tamper must be rejected");
    assert!(matches!(
        err,
        LedgerError::Tamper { index: 0, ref expected, ref found, .. }
            if expected == "V020" && found == "V999"
    ));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn inserting_before_existing_entries_is_tamper() {
    let (mut registry, _store) = test_registry();
    registry.register(SAMPLE_IMPORTER, 1, 0, 0, 0).expect("register");
    registry.add_violation(SAMPLE_IMPORTER, "V1", "d", 1).expect("violation");

    assert!(matches!(
        registry.update(
            SAMPLE_IMPORTER,
            ProfileUpdate::none().with_violation_history(violations(&["V0", "V1"])),
        ),
        Err(LedgerError::Tamper { index: 0, .. })
    ));
}

#[test]
fn appending_through_update_is_accepted() {
    let (mut registry, _store) = test_registry();
    registry.register("29EEEEE4444E1Z5", 3, 1, 0, 5).expect("register");
    registry
        .add_violation("29EEEEE4444E1Z5", "V030", "Minor infraction", 1)
        .expect("violation");

    let appended = vec![
        ViolationBuilder::new("V030")
            .description("Minor infraction")
            .build(),
        ViolationBuilder::new("V031")
            .description("New violation")
            .severity(2)
            .recorded_at("2026-02-01T00:00:00Z")
            .build(),
    ];
    let json = violation_history_json(&appended);
    let profile = registry
        .update_raw("29EEEEE4444E1Z5", "", &json)
        .expect("append accepted");

    assert_eq!(profile.violation_history, appended);
    assert_eq!(
        registry
            .get_importer("29EEEEE4444E1Z5")
            .expect("get")
            .violation_history
            .len(),
        2
    );
}

#[test]
fn equal_length_history_preserving_ids_is_accepted() {
    let (mut registry, _store) = test_registry();
    registry.register(SAMPLE_IMPORTER, 1, 0, 0, 0).expect("register");
    registry.add_violation(SAMPLE_IMPORTER, "V1", "d", 1).expect("violation");

    let same_ids = violations(&["V1"]);
    let profile = registry
        .update(
            SAMPLE_IMPORTER,
            ProfileUpdate::none().with_violation_history(same_ids.clone()),
        )
        .expect("identity-preserving replacement accepted");
    assert_eq!(profile.violation_history, same_ids);
}

#[test]
fn malformed_history_is_rejected_before_any_store_access() {
    let (mut registry, store) = test_registry();
    registry.register(SAMPLE_IMPORTER, 1, 0, 0, 0).expect("register");
    let loads = store.load_count();
    let before = store.snapshot();

    for payload in ["{not json", r#"[{"violation_id":"V1"}]"#, r#"{"violation_id":"V1"}"#] {
        assert!(matches!(
            registry.update_raw(SAMPLE_IMPORTER, "", payload),
            Err(LedgerError::MalformedInput(_))
        ));
    }
    assert_eq!(store.load_count(), loads);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn delete_violation_always_fails() {
    let (mut registry, store) = test_registry();
    registry.register(SAMPLE_IMPORTER, 1, 0, 0, 0).expect("register");
    registry.add_violation(SAMPLE_IMPORTER, "V001", "d", 1).expect("violation");
    let before = store.snapshot();

    for (importer, violation) in [
        (SAMPLE_IMPORTER, "V001"),
        (SAMPLE_IMPORTER, "V404"),
        ("ghost", "V001"),
        ("", ""),
    ] {
        let err = registry
            .delete_violation(importer, violation)
            .expect_err("deletion must be rejected");
        match err {
            LedgerError::DeletionProhibited {
                ref importer_id,
                ref violation_id,
            } => {
                assert_eq!(importer_id, importer);
                assert_eq!(violation_id, violation);
            }
            ref other => unreachable!("unexpected error: {other}"),
        }
    }
    assert_eq!(store.snapshot(), before);
}

#[test]
fn certificates_and_inspections_survive_history_update() {
    let (mut registry, _store) = test_registry();
    registry.register(SAMPLE_IMPORTER, 1, 0, 0, 0).expect("register");
    registry
        .add_aeo_certificate(SAMPLE_IMPORTER, "AEO-1", 2, "CBIC", "2029-01-01T00:00:00Z")
        .expect("certificate");
    registry
        .log_inspection(SAMPLE_IMPORTER, "INS1", "clean", "officer-1")
        .expect("inspection");

    let profile = registry
        .update(
            SAMPLE_IMPORTER,
            ProfileUpdate::none().with_violation_history(violations(&["V1"])),
        )
        .expect("update");
    assert_eq!(profile.aeo_certificates.len(), 1);
    assert_eq!(profile.inspection_logs.len(), 1);
}
