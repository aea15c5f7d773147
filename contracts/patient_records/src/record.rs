use crate::access;
use crate::audit::{self, NewEntry};
use crate::config;
use crate::context::TxContext;
use crate::errors::ContractError;
use crate::events;
use crate::gate;
use crate::storage::{self, DataKey};
use crate::types::{AuditAction, AuditDetail, PatientRecord, Permission, RecordStatus};
use crate::validation;
use soroban_sdk::{Env, Map, String};

fn record_key(resource_id: &String) -> DataKey {
    DataKey::Record(resource_id.clone())
}

fn store(env: &Env, record: &PatientRecord) {
    storage::persist(env, &record_key(&record.resource_id), record);
}

/// Loads a record, failing with `RecordNotFound`.
pub fn load(env: &Env, resource_id: &String) -> Result<PatientRecord, ContractError> {
    storage::load(env, &record_key(resource_id)).ok_or(ContractError::RecordNotFound)
}

fn require_active(record: &PatientRecord) -> Result<(), ContractError> {
    if record.status == RecordStatus::Inactive {
        return Err(ContractError::RecordInactive);
    }
    Ok(())
}

fn stamp(record: &mut PatientRecord, ctx: &TxContext) {
    record.version += 1;
    record.updated_at = ctx.timestamp;
    record.last_tx_id = ctx.tx_id.clone();
    record.last_submitter = ctx.caller.clone();
}

/// Creates a record at version 1 and gives the caller every permission on it.
pub fn register(
    env: &Env,
    ctx: &TxContext,
    resource_id: String,
    data_hash: String,
    metadata: Map<String, String>,
    owner_org: String,
) -> Result<PatientRecord, ContractError> {
    validation::validate_resource_id(&resource_id)?;
    validation::validate_data_hash(&data_hash)?;
    validation::validate_metadata(&metadata, &config::get(env))?;

    if env.storage().persistent().has(&record_key(&resource_id)) {
        return Err(ContractError::RecordAlreadyExists);
    }

    let owner_org = config::resolve_owner_org(env, &ctx.caller, owner_org)?;
    validation::validate_org(&owner_org)?;

    let record = PatientRecord {
        resource_id: resource_id.clone(),
        data_hash: data_hash.clone(),
        metadata,
        owner_org: owner_org.clone(),
        created_at: ctx.timestamp,
        updated_at: ctx.timestamp,
        version: 1,
        status: RecordStatus::Active,
        last_tx_id: ctx.tx_id.clone(),
        last_submitter: ctx.caller.clone(),
    };
    store(env, &record);
    access::bootstrap(env, ctx, &resource_id);

    audit::append(
        env,
        ctx,
        &resource_id,
        NewEntry::new(AuditAction::Register).new_hash(data_hash.clone()),
    );
    events::publish_record_registered(
        env,
        resource_id,
        owner_org,
        data_hash,
        ctx.caller.clone(),
        ctx.tx_id.clone(),
    );

    Ok(record)
}

/// Replaces the content hash and merges `metadata_patch` into the metadata.
///
/// When `previous_hash` is given it must equal the stored hash; a mismatch
/// means another writer got there first and fails with `IntegrityConflict`.
pub fn update(
    env: &Env,
    ctx: &TxContext,
    resource_id: String,
    new_hash: String,
    previous_hash: Option<String>,
    metadata_patch: Map<String, String>,
) -> Result<PatientRecord, ContractError> {
    validation::validate_data_hash(&new_hash)?;
    if let Some(expected) = &previous_hash {
        validation::validate_data_hash(expected)?;
    }

    let mut record = load(env, &resource_id)?;
    gate::require(env, &resource_id, &ctx.caller, Permission::Update)?;
    require_active(&record)?;

    if let Some(expected) = previous_hash {
        if expected != record.data_hash {
            return Err(ContractError::IntegrityConflict);
        }
    }

    let merged = validation::merge_metadata(&record.metadata, &metadata_patch);
    validation::validate_metadata(&merged, &config::get(env))?;

    let replaced_hash = record.data_hash.clone();
    record.data_hash = new_hash.clone();
    record.metadata = merged;
    stamp(&mut record, ctx);
    store(env, &record);

    audit::append(
        env,
        ctx,
        &resource_id,
        NewEntry::new(AuditAction::Update)
            .new_hash(new_hash.clone())
            .previous_hash(replaced_hash),
    );
    events::publish_record_updated(
        env,
        resource_id,
        new_hash,
        record.version,
        ctx.caller.clone(),
        ctx.tx_id.clone(),
    );

    Ok(record)
}

/// Compares `data_hash` with the stored hash. Audited even though nothing
/// about the record changes.
pub fn verify(
    env: &Env,
    ctx: &TxContext,
    resource_id: String,
    data_hash: String,
) -> Result<bool, ContractError> {
    validation::validate_data_hash(&data_hash)?;
    let record = load(env, &resource_id)?;
    gate::require(env, &resource_id, &ctx.caller, Permission::Read)?;

    let matches = record.data_hash == data_hash;
    audit::append(
        env,
        ctx,
        &resource_id,
        NewEntry::new(AuditAction::Verify)
            .new_hash(data_hash)
            .detail(AuditDetail::Verified(matches)),
    );

    Ok(matches)
}

pub fn get(
    env: &Env,
    ctx: &TxContext,
    resource_id: String,
) -> Result<PatientRecord, ContractError> {
    let record = load(env, &resource_id)?;
    gate::require(env, &resource_id, &ctx.caller, Permission::Read)?;

    audit::append(env, ctx, &resource_id, NewEntry::new(AuditAction::Read));

    Ok(record)
}

/// Marks a record `Inactive`. Hash, metadata and trail stay in place and
/// there is no way back to `Active`.
pub fn soft_delete(
    env: &Env,
    ctx: &TxContext,
    resource_id: String,
) -> Result<PatientRecord, ContractError> {
    let mut record = load(env, &resource_id)?;
    gate::require(env, &resource_id, &ctx.caller, Permission::Delete)?;
    require_active(&record)?;

    record.status = RecordStatus::Inactive;
    stamp(&mut record, ctx);
    store(env, &record);

    audit::append(
        env,
        ctx,
        &resource_id,
        NewEntry::new(AuditAction::Delete).previous_hash(record.data_hash.clone()),
    );
    events::publish_record_deleted(
        env,
        resource_id,
        record.version,
        ctx.caller.clone(),
        ctx.tx_id.clone(),
    );

    Ok(record)
}
