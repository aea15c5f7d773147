use crate::audit::{self, NewEntry};
use crate::context::TxContext;
use crate::errors::ContractError;
use crate::events;
use crate::gate;
use crate::storage::{self, DataKey};
use crate::types::{AccessGrant, AuditAction, AuditDetail, Permission};
use soroban_sdk::{Address, Env, String, Vec};

fn grant_key(resource_id: &String, grantee: &Address) -> DataKey {
    DataKey::Grant(resource_id.clone(), grantee.clone())
}

/// Loads the grant a mutation targets, after the grantor's GRANT check.
fn load_for_update(
    env: &Env,
    ctx: &TxContext,
    resource_id: &String,
    grantee: &Address,
) -> Result<AccessGrant, ContractError> {
    gate::require_record(env, resource_id)?;
    gate::require(env, resource_id, &ctx.caller, Permission::Grant)?;
    gate::load_grant(env, resource_id, grantee).ok_or(ContractError::GrantNotFound)
}

fn store(env: &Env, grant: &AccessGrant) {
    let key = grant_key(&grant.resource_id, &grant.grantee);
    let is_new = !env.storage().persistent().has(&key);
    storage::persist(env, &key, grant);

    if is_new {
        storage::push_to_list(
            env,
            &DataKey::Grantees(grant.resource_id.clone()),
            grant.grantee.clone(),
        );
    }
}

fn full_permissions(env: &Env) -> Vec<Permission> {
    let mut permissions = Vec::new(env);
    for permission in Permission::ALL {
        permissions.push_back(permission);
    }
    permissions
}

/// Gives the registering identity every permission on a new record.
///
/// This is the one grant write that skips the GRANT check; the caller's
/// REGISTER audit entry covers it.
pub fn bootstrap(env: &Env, ctx: &TxContext, resource_id: &String) -> AccessGrant {
    let grant = AccessGrant {
        resource_id: resource_id.clone(),
        grantee: ctx.caller.clone(),
        permissions: full_permissions(env),
        expires_at: None,
        created_at: ctx.timestamp,
        created_by: ctx.caller.clone(),
        updated_at: ctx.timestamp,
        updated_by: ctx.caller.clone(),
    };
    store(env, &grant);
    grant
}

/// Creates or replaces the grant for `grantee`.
pub fn grant(
    env: &Env,
    ctx: &TxContext,
    resource_id: &String,
    grantee: &Address,
    permissions: Vec<Permission>,
    expires_at: Option<u64>,
) -> Result<AccessGrant, ContractError> {
    gate::require_record(env, resource_id)?;
    gate::require(env, resource_id, &ctx.caller, Permission::Grant)?;

    let grant = AccessGrant {
        resource_id: resource_id.clone(),
        grantee: grantee.clone(),
        permissions: permissions.clone(),
        expires_at,
        created_at: ctx.timestamp,
        created_by: ctx.caller.clone(),
        updated_at: ctx.timestamp,
        updated_by: ctx.caller.clone(),
    };
    store(env, &grant);

    audit::append(
        env,
        ctx,
        resource_id,
        NewEntry::new(AuditAction::GrantAccess)
            .target(grantee.clone())
            .detail(AuditDetail::Permissions(permissions.clone())),
    );
    events::publish_access_granted(
        env,
        resource_id.clone(),
        ctx.caller.clone(),
        grantee.clone(),
        permissions,
        expires_at,
    );

    Ok(grant)
}

pub fn revoke(
    env: &Env,
    ctx: &TxContext,
    resource_id: &String,
    grantee: &Address,
) -> Result<(), ContractError> {
    load_for_update(env, ctx, resource_id, grantee)?;

    env.storage()
        .persistent()
        .remove(&grant_key(resource_id, grantee));

    let index = DataKey::Grantees(resource_id.clone());
    let grantees: Vec<Address> = storage::load_list(env, &index);
    let mut remaining = Vec::new(env);
    for existing in grantees.iter() {
        if existing != *grantee {
            remaining.push_back(existing);
        }
    }
    storage::persist(env, &index, &remaining);

    audit::append(
        env,
        ctx,
        resource_id,
        NewEntry::new(AuditAction::RevokeAccess).target(grantee.clone()),
    );
    events::publish_access_revoked(env, resource_id.clone(), ctx.caller.clone(), grantee.clone());

    Ok(())
}

/// Replaces the expiry of an existing grant. `None` removes the bound.
pub fn update_expiry(
    env: &Env,
    ctx: &TxContext,
    resource_id: &String,
    grantee: &Address,
    expires_at: Option<u64>,
) -> Result<AccessGrant, ContractError> {
    let mut grant = load_for_update(env, ctx, resource_id, grantee)?;
    grant.expires_at = expires_at;
    grant.updated_at = ctx.timestamp;
    grant.updated_by = ctx.caller.clone();
    store(env, &grant);

    let detail = match expires_at {
        Some(at) => AuditDetail::Expiry(at),
        None => AuditDetail::ExpiryCleared,
    };
    audit::append(
        env,
        ctx,
        resource_id,
        NewEntry::new(AuditAction::UpdateAccessExpiry)
            .target(grantee.clone())
            .detail(detail),
    );
    events::publish_access_expiry_updated(
        env,
        resource_id.clone(),
        ctx.caller.clone(),
        grantee.clone(),
        expires_at,
    );

    Ok(grant)
}

pub fn update_permissions(
    env: &Env,
    ctx: &TxContext,
    resource_id: &String,
    grantee: &Address,
    permissions: Vec<Permission>,
) -> Result<AccessGrant, ContractError> {
    let mut grant = load_for_update(env, ctx, resource_id, grantee)?;
    grant.permissions = permissions.clone();
    grant.updated_at = ctx.timestamp;
    grant.updated_by = ctx.caller.clone();
    store(env, &grant);

    audit::append(
        env,
        ctx,
        resource_id,
        NewEntry::new(AuditAction::UpdateAccessPermissions)
            .target(grantee.clone())
            .detail(AuditDetail::Permissions(permissions.clone())),
    );
    events::publish_access_permissions_updated(
        env,
        resource_id.clone(),
        ctx.caller.clone(),
        grantee.clone(),
        permissions,
    );

    Ok(grant)
}

/// Every stored grant on a record, expired ones included, in grant order.
pub fn list(
    env: &Env,
    caller: &Address,
    resource_id: &String,
) -> Result<Vec<AccessGrant>, ContractError> {
    gate::require_record(env, resource_id)?;
    gate::require(env, resource_id, caller, Permission::Read)?;

    let grantees: Vec<Address> = storage::load_list(env, &DataKey::Grantees(resource_id.clone()));
    let mut grants = Vec::new(env);
    for grantee in grantees.iter() {
        if let Some(grant) = gate::load_grant(env, resource_id, &grantee) {
            grants.push_back(grant);
        }
    }
    Ok(grants)
}
