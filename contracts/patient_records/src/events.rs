#![allow(deprecated)]

use crate::errors::ErrorContext;
use crate::types::{AuditEntry, Permission, RegistryConfig};
use soroban_sdk::{symbol_short, Address, BytesN, Env, String, Vec};

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when the administrator changes the registry limits.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdatedEvent {
    pub admin: Address,
    pub config: RegistryConfig,
    pub timestamp: u64,
}

/// Event published when an identity is assigned to an organisation.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrgAssignedEvent {
    pub member: Address,
    pub org: String,
    pub timestamp: u64,
}

/// Event published when a new record is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordRegisteredEvent {
    pub resource_id: String,
    pub owner_org: String,
    pub data_hash: String,
    pub submitter: Address,
    pub tx_id: BytesN<32>,
    pub timestamp: u64,
}

/// Event published when a record's hash or metadata changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordUpdatedEvent {
    pub resource_id: String,
    pub data_hash: String,
    pub version: u32,
    pub submitter: Address,
    pub tx_id: BytesN<32>,
    pub timestamp: u64,
}

/// Event published when a record is soft-deleted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordDeletedEvent {
    pub resource_id: String,
    pub version: u32,
    pub submitter: Address,
    pub tx_id: BytesN<32>,
    pub timestamp: u64,
}

/// Event published when access is granted (or a grant is replaced).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub resource_id: String,
    pub grantor: Address,
    pub grantee: Address,
    pub permissions: Vec<Permission>,
    pub expires_at: Option<u64>,
    pub timestamp: u64,
}

/// Event published when access is revoked.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRevokedEvent {
    pub resource_id: String,
    pub grantor: Address,
    pub grantee: Address,
    pub timestamp: u64,
}

/// Event published when a grant's expiry changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessExpiryUpdatedEvent {
    pub resource_id: String,
    pub grantor: Address,
    pub grantee: Address,
    pub expires_at: Option<u64>,
    pub timestamp: u64,
}

/// Event published when a grant's permission set changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessPermissionsUpdatedEvent {
    pub resource_id: String,
    pub grantor: Address,
    pub grantee: Address,
    pub permissions: Vec<Permission>,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_config_updated(env: &Env, admin: Address, config: RegistryConfig) {
    let topics = (symbol_short!("CFG_SET"), admin.clone());
    let data = ConfigUpdatedEvent {
        admin,
        config,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_org_assigned(env: &Env, member: Address, org: String) {
    let topics = (symbol_short!("ORG_SET"), member.clone());
    let data = OrgAssignedEvent {
        member,
        org,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a new record is registered.
pub fn publish_record_registered(
    env: &Env,
    resource_id: String,
    owner_org: String,
    data_hash: String,
    submitter: Address,
    tx_id: BytesN<32>,
) {
    let topics = (symbol_short!("REC_REG"), resource_id.clone());
    let data = RecordRegisteredEvent {
        resource_id,
        owner_org,
        data_hash,
        submitter,
        tx_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_record_updated(
    env: &Env,
    resource_id: String,
    data_hash: String,
    version: u32,
    submitter: Address,
    tx_id: BytesN<32>,
) {
    let topics = (symbol_short!("REC_UPD"), resource_id.clone());
    let data = RecordUpdatedEvent {
        resource_id,
        data_hash,
        version,
        submitter,
        tx_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_record_deleted(
    env: &Env,
    resource_id: String,
    version: u32,
    submitter: Address,
    tx_id: BytesN<32>,
) {
    let topics = (symbol_short!("REC_DEL"), resource_id.clone());
    let data = RecordDeletedEvent {
        resource_id,
        version,
        submitter,
        tx_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when access is granted to a record.
/// This event includes the grantor, grantee, permission set and expiry.
pub fn publish_access_granted(
    env: &Env,
    resource_id: String,
    grantor: Address,
    grantee: Address,
    permissions: Vec<Permission>,
    expires_at: Option<u64>,
) {
    let topics = (symbol_short!("ACC_GRT"), resource_id.clone(), grantee.clone());
    let data = AccessGrantedEvent {
        resource_id,
        grantor,
        grantee,
        permissions,
        expires_at,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_revoked(env: &Env, resource_id: String, grantor: Address, grantee: Address) {
    let topics = (symbol_short!("ACC_REV"), resource_id.clone(), grantee.clone());
    let data = AccessRevokedEvent {
        resource_id,
        grantor,
        grantee,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_expiry_updated(
    env: &Env,
    resource_id: String,
    grantor: Address,
    grantee: Address,
    expires_at: Option<u64>,
) {
    let topics = (symbol_short!("ACC_EXP"), resource_id.clone(), grantee.clone());
    let data = AccessExpiryUpdatedEvent {
        resource_id,
        grantor,
        grantee,
        expires_at,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_permissions_updated(
    env: &Env,
    resource_id: String,
    grantor: Address,
    grantee: Address,
    permissions: Vec<Permission>,
) {
    let topics = (symbol_short!("ACC_PRM"), resource_id.clone(), grantee.clone());
    let data = AccessPermissionsUpdatedEvent {
        resource_id,
        grantor,
        grantee,
        permissions,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes every appended audit entry so off-chain indexers can mirror
/// the trail without reading contract storage.
pub fn publish_audit_appended(env: &Env, entry: AuditEntry) {
    let topics = (
        symbol_short!("AUDIT"),
        entry.resource_id.clone(),
        entry.action,
    );
    env.events().publish(topics, entry);
}

pub fn publish_error(env: &Env, error_code: u32, context: ErrorContext) {
    let topics = (
        symbol_short!("ERROR"),
        context.category.clone(),
        context.severity.clone(),
    );
    let data = (
        error_code,
        context.message,
        context.user,
        context.resource_id,
        context.timestamp,
        context.retryable,
    );
    env.events().publish(topics, data);
}
