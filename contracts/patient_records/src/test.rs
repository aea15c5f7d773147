#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use super::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{map, vec, Env};

fn setup() -> (Env, PatientRecordsContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(PatientRecordsContract, ());
    let client = PatientRecordsContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    (env, client, admin)
}

fn s(env: &Env, value: &str) -> String {
    String::from_str(env, value)
}

#[test]
fn test_initialize() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(PatientRecordsContract, ());
    let client = PatientRecordsContractClient::new(&env, &contract_id);

    assert!(!client.is_initialized());
    assert!(matches!(
        client.try_get_admin(),
        Err(Ok(ContractError::NotInitialized))
    ));

    let admin = Address::generate(&env);
    client.initialize(&admin);

    assert!(client.is_initialized());
    assert_eq!(client.get_admin(), admin);
    assert!(matches!(
        client.try_initialize(&admin),
        Err(Ok(ContractError::AlreadyInitialized))
    ));
}

#[test]
fn test_version() {
    let (_env, client, _admin) = setup();
    assert_eq!(client.version(), 1);
}

#[test]
fn test_register_bootstraps_owner_grant() {
    let (env, client, _admin) = setup();
    let owner = Address::generate(&env);
    let rid = s(&env, "p1");

    let record = client.register_record(
        &owner,
        &rid,
        &s(&env, "h1"),
        &map![&env, (s(&env, "type"), s(&env, "lab"))],
        &s(&env, "General Hospital"),
    );

    assert_eq!(record.version, 1);
    assert_eq!(record.status, RecordStatus::Active);
    assert_eq!(record.last_submitter, owner);

    let acl = client.get_access_control_list(&owner, &rid);
    assert_eq!(acl.len(), 1);
    let grant = acl.get(0).unwrap();
    assert_eq!(grant.grantee, owner);
    assert_eq!(
        grant.permissions,
        vec![
            &env,
            Permission::Read,
            Permission::Update,
            Permission::Delete,
            Permission::Grant
        ]
    );
    assert_eq!(grant.expires_at, None);

    // The bootstrap grant is covered by the single REGISTER entry.
    let trail = client.get_audit_trail(&owner, &rid);
    assert_eq!(trail.len(), 1);
    assert_eq!(trail.get(0).unwrap().action, AuditAction::Register);
}

#[test]
fn test_end_to_end_scenario() {
    let (env, client, _admin) = setup();
    let a = Address::generate(&env);
    let b = Address::generate(&env);
    let rid = s(&env, "p1");

    env.ledger().set_timestamp(1_000);
    client.register_record(&a, &rid, &s(&env, "h1"), &Map::new(&env), &s(&env, "Org A"));

    client.grant_access(
        &a,
        &rid,
        &b,
        &vec![&env, s(&env, "READ")],
        &Some(1_500),
    );
    assert!(client.verify_record(&b, &rid, &s(&env, "h1")));

    env.ledger().set_timestamp(1_600);
    assert!(matches!(
        client.try_verify_record(&b, &rid, &s(&env, "h1")),
        Err(Ok(ContractError::PermissionDenied))
    ));

    client.update_access_expiry(&a, &rid, &b, &Some(2_000));
    assert!(client.verify_record(&b, &rid, &s(&env, "h1")));

    client.update_record(
        &a,
        &rid,
        &s(&env, "h2"),
        &Some(s(&env, "h1")),
        &Map::new(&env),
    );
    assert!(!client.verify_record(&b, &rid, &s(&env, "h1")));

    let trail = client.get_audit_trail(&a, &rid);
    let actions: soroban_sdk::Vec<AuditAction> = {
        let mut out = soroban_sdk::Vec::new(&env);
        for entry in trail.iter() {
            out.push_back(entry.action);
        }
        out
    };
    assert_eq!(
        actions,
        vec![
            &env,
            AuditAction::Verify,
            AuditAction::Update,
            AuditAction::Verify,
            AuditAction::UpdateAccessExpiry,
            AuditAction::Verify,
            AuditAction::GrantAccess,
            AuditAction::Register
        ]
    );
    assert!(client.verify_audit_chain(&a, &rid));
}

#[test]
fn test_reader_cannot_update() {
    let (env, client, _admin) = setup();
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    let rid = s(&env, "p1");

    let record = client.register_record(
        &alice,
        &rid,
        &s(&env, "h1"),
        &Map::new(&env),
        &s(&env, "OrgA"),
    );
    assert_eq!(record.version, 1);
    assert_eq!(record.status, RecordStatus::Active);

    client.grant_access(&alice, &rid, &bob, &vec![&env, s(&env, "READ")], &None);
    assert!(client.check_access(&rid, &bob, &s(&env, "READ")));
    assert!(!client.check_access(&rid, &bob, &s(&env, "UPDATE")));

    assert!(matches!(
        client.try_update_record(
            &bob,
            &rid,
            &s(&env, "h2"),
            &Some(s(&env, "h1")),
            &Map::new(&env)
        ),
        Err(Ok(ContractError::PermissionDenied))
    ));
    let record = client.update_record(
        &alice,
        &rid,
        &s(&env, "h2"),
        &Some(s(&env, "h1")),
        &Map::new(&env),
    );
    assert_eq!(record.version, 2);
    assert_eq!(record.data_hash, s(&env, "h2"));

    let trail = client.get_audit_trail(&alice, &rid);
    assert_eq!(trail.len(), 3);
    assert_eq!(trail.get(0).unwrap().action, AuditAction::Update);
    assert_eq!(trail.get(1).unwrap().action, AuditAction::GrantAccess);
    assert_eq!(trail.get(2).unwrap().action, AuditAction::Register);
}

#[test]
fn test_tx_ids_are_unique_within_a_ledger() {
    let (env, client, _admin) = setup();
    let owner = Address::generate(&env);
    let rid = s(&env, "p1");

    let first = client.register_record(
        &owner,
        &rid,
        &s(&env, "h1"),
        &Map::new(&env),
        &s(&env, "Org"),
    );
    let second = client.update_record(&owner, &rid, &s(&env, "h2"), &None, &Map::new(&env));

    assert_ne!(first.last_tx_id, second.last_tx_id);

    let entry = client.get_audit_entry_by_tx_id(&owner, &rid, &second.last_tx_id);
    assert_eq!(entry.action, AuditAction::Update);
    assert_eq!(entry.previous_hash, Some(s(&env, "h1")));
    assert_eq!(entry.new_hash, Some(s(&env, "h2")));
}

#[test]
fn test_check_access_is_read_only() {
    let (env, client, _admin) = setup();
    let owner = Address::generate(&env);
    let stranger = Address::generate(&env);
    let rid = s(&env, "p1");

    client.register_record(&owner, &rid, &s(&env, "h1"), &Map::new(&env), &s(&env, "Org"));

    assert!(client.check_access(&rid, &owner, &s(&env, "delete")));
    assert!(!client.check_access(&rid, &stranger, &s(&env, "READ")));
    assert!(!client.check_access(&s(&env, "missing"), &owner, &s(&env, "READ")));
    assert!(matches!(
        client.try_check_access(&rid, &owner, &s(&env, "ADMIN")),
        Err(Ok(ContractError::InvalidPermission))
    ));

    assert_eq!(client.get_audit_trail(&owner, &rid).len(), 1);
}

#[test]
fn test_config_is_admin_only() {
    let (env, client, admin) = setup();
    let other = Address::generate(&env);
    let tight = RegistryConfig {
        max_metadata_entries: 1,
        max_field_len: 8,
    };

    assert!(matches!(
        client.try_set_config(&other, &tight),
        Err(Ok(ContractError::Unauthorized))
    ));
    assert_eq!(client.get_config(), config::defaults());

    client.set_config(&admin, &tight);
    assert_eq!(client.get_config(), tight);

    let owner = Address::generate(&env);
    let res = client.try_register_record(
        &owner,
        &s(&env, "p1"),
        &s(&env, "h1"),
        &map![&env, (s(&env, "a"), s(&env, "1")), (s(&env, "b"), s(&env, "2"))],
        &s(&env, "Org"),
    );
    assert!(matches!(res, Err(Ok(ContractError::MetadataFormatError))));
}
