//! Permission checks shared by the record, access and audit modules.
//!
//! Grants are read from storage on every call; nothing is cached between
//! checks, so a revoke or expiry takes effect in the very next transaction.

use crate::errors::ContractError;
use crate::storage::{self, DataKey};
use crate::types::{AccessGrant, Permission};
use soroban_sdk::{Address, Env, String};

/// The stored grant for `identity` on `resource_id`, live or not.
pub fn load_grant(env: &Env, resource_id: &String, identity: &Address) -> Option<AccessGrant> {
    storage::load(env, &DataKey::Grant(resource_id.clone(), identity.clone()))
}

/// A grant stops being honoured once the ledger clock reaches its expiry.
pub fn is_live(grant: &AccessGrant, now: u64) -> bool {
    grant.expires_at.map_or(true, |expires_at| now < expires_at)
}

pub fn check_access(
    env: &Env,
    resource_id: &String,
    identity: &Address,
    permission: Permission,
) -> bool {
    match load_grant(env, resource_id, identity) {
        Some(grant) => {
            is_live(&grant, env.ledger().timestamp()) && grant.permissions.contains(&permission)
        }
        None => false,
    }
}

/// Fails with `RecordNotFound` unless `resource_id` has been registered.
pub fn require_record(env: &Env, resource_id: &String) -> Result<(), ContractError> {
    if !env
        .storage()
        .persistent()
        .has(&DataKey::Record(resource_id.clone()))
    {
        return Err(ContractError::RecordNotFound);
    }
    Ok(())
}

/// Fails with `PermissionDenied` unless `identity` holds a live `permission`.
pub fn require(
    env: &Env,
    resource_id: &String,
    identity: &Address,
    permission: Permission,
) -> Result<(), ContractError> {
    if !check_access(env, resource_id, identity, permission) {
        return Err(ContractError::PermissionDenied);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::vec;

    fn grant(env: &Env, expires_at: Option<u64>) -> AccessGrant {
        let holder = Address::generate(env);
        AccessGrant {
            resource_id: String::from_str(env, "p1"),
            grantee: holder.clone(),
            permissions: vec![env, Permission::Read],
            expires_at,
            created_at: 0,
            created_by: holder.clone(),
            updated_at: 0,
            updated_by: holder,
        }
    }

    #[test]
    fn grant_without_expiry_is_always_live() {
        let env = Env::default();
        assert!(is_live(&grant(&env, None), u64::MAX));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let env = Env::default();
        let g = grant(&env, Some(100));
        assert!(is_live(&g, 99));
        assert!(!is_live(&g, 100));
        assert!(!is_live(&g, 101));
    }
}
