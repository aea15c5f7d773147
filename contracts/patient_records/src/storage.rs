use crate::types::AuditAction;
use soroban_sdk::{contracttype, Address, BytesN, Env, IntoVal, String, TryFromVal, Val, Vec};

/// Composite storage keys.
///
/// `Admin`, `Config` and `TxCounter` live in instance storage; everything
/// else is persistent and scoped by record id so per-record scans never
/// touch another record's entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Config,
    TxCounter,
    MemberOrg(Address),
    Record(String),
    Grant(String, Address),
    Grantees(String),
    Audit(String, BytesN<32>),
    AuditHead(String),
    // Counter-addressed tx-id indexes: `*Count` holds the length, `*At(.., n)`
    // the n-th tx id in append order.
    AuditCount(String),
    AuditAt(String, u32),
    AuditActionCount(String, AuditAction),
    AuditActionAt(String, AuditAction, u32),
    AuditSubmitterCount(String, Address),
    AuditSubmitterAt(String, Address, u32),
}

/// Writes a persistent entry and extends its TTL.
pub fn persist<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    common::extend_persistent(env, key);
}

pub fn load<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
{
    env.storage().persistent().get(key)
}

pub fn load_list<T>(env: &Env, key: &DataKey) -> Vec<T>
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or(Vec::new(env))
}

/// Appends `item` to the list stored under `key`, creating it if needed.
pub fn push_to_list<T>(env: &Env, key: &DataKey, item: T)
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    let mut list: Vec<T> = load_list(env, key);
    list.push_back(item);
    persist(env, key, &list);
}
