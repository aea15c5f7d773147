#![no_std]
//! Ledger-backed patient record registry.
//!
//! The contract stores content hashes of off-chain records together with a
//! per-record, time-bounded capability list and an append-only, hash-chained
//! audit trail. Every operation is a deterministic function of its arguments
//! and the ledger state; the only clock is the ledger timestamp.
//!
//! Each entry point authenticates its `caller`, builds a [`TxContext`] and
//! delegates to one of three modules:
//! - `record`: register, update, verify, read and soft-delete records,
//! - `access`: grant, revoke and amend per-record permission sets,
//! - `audit`: the trail itself and its filtered queries.
//!
//! All three consult `gate` for authorization. A failed operation returns an
//! error and the host discards every write it made, so record, grant and
//! audit changes always commit together. The modules return bare errors; each
//! entry point hands its outcome to [`errors::reported`], which publishes the
//! `ERROR` event for a failure exactly once.

mod access;
mod audit;
mod config;
mod context;
pub mod errors;
pub mod events;
mod gate;
mod record;
mod storage;
pub mod types;
mod validation;

use context::TxContext;
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Map, String, Vec};

pub use errors::{ContractError, ErrorCategory, ErrorContext, ErrorSeverity};
pub use types::{
    AccessGrant, AuditAction, AuditDetail, AuditEntry, PatientRecord, Permission, RecordStatus,
    RegistryConfig,
};

#[contract]
pub struct PatientRecordsContract;

#[contractimpl]
impl PatientRecordsContract {
    // ── Administration ───────────────────────────────────────────────────────

    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if config::is_initialized(&env) {
            return errors::reported(
                &env,
                Err(ContractError::AlreadyInitialized),
                Some(&admin),
                None,
            );
        }

        admin.require_auth();

        config::set_admin(&env, &admin);
        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        errors::reported(&env, config::admin(&env), None, None)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    /// Replace the metadata limits. Admin only.
    pub fn set_config(
        env: Env,
        caller: Address,
        config: RegistryConfig,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let res = config::require_admin(&env, &caller).and_then(|()| config::set(&env, &config));
        errors::reported(&env, res, Some(&caller), None)?;
        events::publish_config_updated(&env, caller, config);
        Ok(())
    }

    /// Current limits (defaults until `set_config` is called).
    pub fn get_config(env: Env) -> RegistryConfig {
        config::get(&env)
    }

    /// Record which organisation `member` belongs to. Admin only.
    pub fn assign_org(
        env: Env,
        caller: Address,
        member: Address,
        org: String,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let res =
            config::require_admin(&env, &caller).and_then(|()| validation::validate_org(&org));
        errors::reported(&env, res, Some(&caller), None)?;
        config::assign_org(&env, &member, &org);
        events::publish_org_assigned(&env, member, org);
        Ok(())
    }

    pub fn get_org(env: Env, member: Address) -> Option<String> {
        config::member_org(&env, &member)
    }

    // ── Records ──────────────────────────────────────────────────────────────

    /// Register a new record. An empty `owner_org` falls back to the caller's
    /// assigned organisation.
    pub fn register_record(
        env: Env,
        caller: Address,
        resource_id: String,
        data_hash: String,
        metadata: Map<String, String>,
        owner_org: String,
    ) -> Result<PatientRecord, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = record::register(
            &env,
            &ctx,
            resource_id.clone(),
            data_hash,
            metadata,
            owner_org,
        );
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    /// Replace a record's hash, optionally guarded by the hash the caller
    /// last saw, and merge `metadata_patch` into its metadata.
    pub fn update_record(
        env: Env,
        caller: Address,
        resource_id: String,
        new_hash: String,
        previous_hash: Option<String>,
        metadata_patch: Map<String, String>,
    ) -> Result<PatientRecord, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = record::update(
            &env,
            &ctx,
            resource_id.clone(),
            new_hash,
            previous_hash,
            metadata_patch,
        );
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    /// Check `data_hash` against the stored hash.
    pub fn verify_record(
        env: Env,
        caller: Address,
        resource_id: String,
        data_hash: String,
    ) -> Result<bool, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = record::verify(&env, &ctx, resource_id.clone(), data_hash);
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    pub fn get_record(
        env: Env,
        caller: Address,
        resource_id: String,
    ) -> Result<PatientRecord, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = record::get(&env, &ctx, resource_id.clone());
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    /// Soft-delete a record. Irreversible.
    pub fn delete_record(
        env: Env,
        caller: Address,
        resource_id: String,
    ) -> Result<PatientRecord, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = record::soft_delete(&env, &ctx, resource_id.clone());
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    // ── Access control ───────────────────────────────────────────────────────

    /// Grant (or replace) `grantee`'s permissions on a record.
    /// Permission tokens are case-insensitive: READ, UPDATE, DELETE, GRANT.
    pub fn grant_access(
        env: Env,
        caller: Address,
        resource_id: String,
        grantee: Address,
        permissions: Vec<String>,
        expires_at: Option<u64>,
    ) -> Result<AccessGrant, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = validation::parse_permissions(&env, &permissions).and_then(|permissions| {
            access::grant(&env, &ctx, &resource_id, &grantee, permissions, expires_at)
        });
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    pub fn revoke_access(
        env: Env,
        caller: Address,
        resource_id: String,
        grantee: Address,
    ) -> Result<(), ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = access::revoke(&env, &ctx, &resource_id, &grantee);
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    pub fn update_access_expiry(
        env: Env,
        caller: Address,
        resource_id: String,
        grantee: Address,
        expires_at: Option<u64>,
    ) -> Result<AccessGrant, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = access::update_expiry(&env, &ctx, &resource_id, &grantee, expires_at);
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    pub fn update_access_permissions(
        env: Env,
        caller: Address,
        resource_id: String,
        grantee: Address,
        permissions: Vec<String>,
    ) -> Result<AccessGrant, ContractError> {
        let ctx = TxContext::begin(&env, caller);
        let res = validation::parse_permissions(&env, &permissions).and_then(|permissions| {
            access::update_permissions(&env, &ctx, &resource_id, &grantee, permissions)
        });
        errors::reported(&env, res, Some(&ctx.caller), Some(&resource_id))
    }

    pub fn get_access_control_list(
        env: Env,
        caller: Address,
        resource_id: String,
    ) -> Result<Vec<AccessGrant>, ContractError> {
        caller.require_auth();
        let res = access::list(&env, &caller, &resource_id);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    /// Whether `identity` currently holds `permission` on the record.
    /// Unauthenticated and not audited.
    pub fn check_access(
        env: Env,
        resource_id: String,
        identity: Address,
        permission: String,
    ) -> Result<bool, ContractError> {
        let res = validation::parse_permission(&permission)
            .map(|permission| gate::check_access(&env, &resource_id, &identity, permission));
        errors::reported(&env, res, Some(&identity), Some(&resource_id))
    }

    // ── Audit trail ──────────────────────────────────────────────────────────

    /// Full trail of a record, newest first.
    pub fn get_audit_trail(
        env: Env,
        caller: Address,
        resource_id: String,
    ) -> Result<Vec<AuditEntry>, ContractError> {
        caller.require_auth();
        let res = audit::trail(&env, &caller, &resource_id);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    /// Entries whose timestamp lies in `[start, end]`, newest first.
    pub fn get_audit_trail_by_date_range(
        env: Env,
        caller: Address,
        resource_id: String,
        start: u64,
        end: u64,
    ) -> Result<Vec<AuditEntry>, ContractError> {
        caller.require_auth();
        let res = audit::trail_by_date_range(&env, &caller, &resource_id, start, end);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    pub fn get_audit_trail_by_action(
        env: Env,
        caller: Address,
        resource_id: String,
        action: AuditAction,
    ) -> Result<Vec<AuditEntry>, ContractError> {
        caller.require_auth();
        let res = audit::trail_by_action(&env, &caller, &resource_id, action);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    pub fn get_audit_trail_by_submitter(
        env: Env,
        caller: Address,
        resource_id: String,
        submitter: Address,
    ) -> Result<Vec<AuditEntry>, ContractError> {
        caller.require_auth();
        let res = audit::trail_by_submitter(&env, &caller, &resource_id, &submitter);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    pub fn get_audit_entry_by_tx_id(
        env: Env,
        caller: Address,
        resource_id: String,
        tx_id: BytesN<32>,
    ) -> Result<AuditEntry, ContractError> {
        caller.require_auth();
        let res = audit::entry_by_tx_id(&env, &caller, &resource_id, &tx_id);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    /// Recompute the record's audit hash chain.
    pub fn verify_audit_chain(
        env: Env,
        caller: Address,
        resource_id: String,
    ) -> Result<bool, ContractError> {
        caller.require_auth();
        let res = audit::verify_chain(&env, &caller, &resource_id);
        errors::reported(&env, res, Some(&caller), Some(&resource_id))
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

#[cfg(test)]
mod test;
