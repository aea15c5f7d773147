use crate::errors::ContractError;
use crate::storage::{self, DataKey};
use crate::types::RegistryConfig;
use soroban_sdk::{Address, Env, String};

pub const DEFAULT_MAX_METADATA_ENTRIES: u32 = 32;
pub const DEFAULT_MAX_FIELD_LEN: u32 = 256;

pub fn defaults() -> RegistryConfig {
    RegistryConfig {
        max_metadata_entries: DEFAULT_MAX_METADATA_ENTRIES,
        max_field_len: DEFAULT_MAX_FIELD_LEN,
    }
}

/// The stored configuration, or the defaults when none has been set.
pub fn get(env: &Env) -> RegistryConfig {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(defaults)
}

pub fn set(env: &Env, config: &RegistryConfig) -> Result<(), ContractError> {
    if config.max_metadata_entries == 0 || config.max_field_len == 0 {
        return Err(ContractError::InvalidInput);
    }
    env.storage().instance().set(&DataKey::Config, config);
    common::extend_instance(env);
    Ok(())
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    common::extend_instance(env);
}

pub fn admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(ContractError::NotInitialized)
}

pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if admin(env)? != *caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

// ── Organisation membership ──────────────────────────────────

pub fn assign_org(env: &Env, member: &Address, org: &String) {
    storage::persist(env, &DataKey::MemberOrg(member.clone()), org);
}

pub fn member_org(env: &Env, member: &Address) -> Option<String> {
    storage::load(env, &DataKey::MemberOrg(member.clone()))
}

/// Picks the owning organisation for a new record: the explicit argument,
/// else the caller's assigned organisation.
pub fn resolve_owner_org(
    env: &Env,
    caller: &Address,
    owner_org: String,
) -> Result<String, ContractError> {
    if !owner_org.is_empty() {
        return Ok(owner_org);
    }
    member_org(env, caller).ok_or(ContractError::InvalidInput)
}
