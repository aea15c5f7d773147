//! Append-only audit trail, one chain per record.
//!
//! Every entry is keyed by `(resource_id, tx_id)` and written exactly once.
//! Entries are linked through `prev_entry_hash` (sha256 of the previous
//! entry's XDR), which makes any out-of-band edit of a stored entry
//! detectable via [`verify_chain`].
//!
//! Besides the per-record index in append order, the log keeps secondary
//! indexes by action and by submitter so the filtered queries read only the
//! entries they return. Every index slot is its own storage entry, so an
//! append writes the same number of bytes however long the trail grows.

use crate::context::TxContext;
use crate::errors::ContractError;
use crate::events;
use crate::gate;
use crate::storage::{self, DataKey};
use crate::types::{AuditAction, AuditDetail, AuditEntry, Permission};
use soroban_sdk::{xdr::ToXdr, Address, BytesN, Env, String, Vec};

/// The variable part of an entry; the rest comes from the [`TxContext`].
#[derive(Clone, Debug)]
pub struct NewEntry {
    pub action: AuditAction,
    pub new_hash: Option<String>,
    pub previous_hash: Option<String>,
    pub target: Option<Address>,
    pub detail: AuditDetail,
}

impl NewEntry {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            new_hash: None,
            previous_hash: None,
            target: None,
            detail: AuditDetail::None,
        }
    }

    pub fn new_hash(mut self, hash: String) -> Self {
        self.new_hash = Some(hash);
        self
    }

    pub fn previous_hash(mut self, hash: String) -> Self {
        self.previous_hash = Some(hash);
        self
    }

    pub fn target(mut self, target: Address) -> Self {
        self.target = Some(target);
        self
    }

    pub fn detail(mut self, detail: AuditDetail) -> Self {
        self.detail = detail;
        self
    }
}

/// One of the three tx-id indexes kept per record.
#[derive(Clone, Debug)]
enum Index {
    All,
    Action(AuditAction),
    Submitter(Address),
}

impl Index {
    fn count_key(&self, resource_id: &String) -> DataKey {
        let rid = resource_id.clone();
        match self {
            Index::All => DataKey::AuditCount(rid),
            Index::Action(action) => DataKey::AuditActionCount(rid, *action),
            Index::Submitter(submitter) => DataKey::AuditSubmitterCount(rid, submitter.clone()),
        }
    }

    fn slot_key(&self, resource_id: &String, n: u32) -> DataKey {
        let rid = resource_id.clone();
        match self {
            Index::All => DataKey::AuditAt(rid, n),
            Index::Action(action) => DataKey::AuditActionAt(rid, *action, n),
            Index::Submitter(submitter) => DataKey::AuditSubmitterAt(rid, submitter.clone(), n),
        }
    }

    fn len(&self, env: &Env, resource_id: &String) -> u32 {
        storage::load(env, &self.count_key(resource_id)).unwrap_or(0)
    }

    fn get(&self, env: &Env, resource_id: &String, n: u32) -> Option<BytesN<32>> {
        storage::load(env, &self.slot_key(resource_id, n))
    }

    fn push(&self, env: &Env, resource_id: &String, tx_id: &BytesN<32>) {
        let n = self.len(env, resource_id);
        storage::persist(env, &self.slot_key(resource_id, n), tx_id);
        storage::persist(env, &self.count_key(resource_id), &(n + 1));
    }
}

fn entry_hash(env: &Env, entry: &AuditEntry) -> BytesN<32> {
    common::sha256(env, &entry.clone().to_xdr(env))
}

/// Appends one entry for the current transaction.
///
/// Only the record and access modules call this, from inside their own
/// operation, so the entry commits or aborts together with the mutation.
pub fn append(
    env: &Env,
    ctx: &TxContext,
    resource_id: &String,
    new_entry: NewEntry,
) -> AuditEntry {
    let head_key = DataKey::AuditHead(resource_id.clone());
    let prev_entry_hash: BytesN<32> =
        storage::load(env, &head_key).unwrap_or_else(|| common::zero_digest(env));

    let entry = AuditEntry {
        resource_id: resource_id.clone(),
        action: new_entry.action,
        actor: ctx.caller.clone(),
        timestamp: ctx.timestamp,
        tx_id: ctx.tx_id.clone(),
        new_hash: new_entry.new_hash,
        previous_hash: new_entry.previous_hash,
        target: new_entry.target,
        detail: new_entry.detail,
        prev_entry_hash,
    };

    // tx ids are unique per invocation, so this key has never been written.
    storage::persist(
        env,
        &DataKey::Audit(resource_id.clone(), ctx.tx_id.clone()),
        &entry,
    );
    storage::persist(env, &head_key, &entry_hash(env, &entry));

    for index in [
        Index::All,
        Index::Action(entry.action),
        Index::Submitter(ctx.caller.clone()),
    ] {
        index.push(env, resource_id, &ctx.tx_id);
    }

    events::publish_audit_appended(env, entry.clone());
    entry
}

fn load_entry(env: &Env, resource_id: &String, tx_id: &BytesN<32>) -> Option<AuditEntry> {
    storage::load(env, &DataKey::Audit(resource_id.clone(), tx_id.clone()))
}

/// Resolves an index newest-first, keeping entries accepted by `keep`.
/// Stops early once `stop` returns true for an entry.
fn collect_desc(
    env: &Env,
    resource_id: &String,
    index: Index,
    keep: impl Fn(&AuditEntry) -> bool,
    stop: impl Fn(&AuditEntry) -> bool,
) -> Vec<AuditEntry> {
    let mut out = Vec::new(env);
    for n in (0..index.len(env, resource_id)).rev() {
        let Some(tx_id) = index.get(env, resource_id, n) else {
            continue;
        };
        let Some(entry) = load_entry(env, resource_id, &tx_id) else {
            continue;
        };
        if stop(&entry) {
            break;
        }
        if keep(&entry) {
            out.push_back(entry);
        }
    }
    out
}

/// Common guard for every query: the record exists and `caller` may read it.
fn require_reader(env: &Env, caller: &Address, resource_id: &String) -> Result<(), ContractError> {
    gate::require_record(env, resource_id)?;
    gate::require(env, resource_id, caller, Permission::Read)
}

/// The full trail for a record, newest first.
pub fn trail(
    env: &Env,
    caller: &Address,
    resource_id: &String,
) -> Result<Vec<AuditEntry>, ContractError> {
    require_reader(env, caller, resource_id)?;
    Ok(collect_desc(env, resource_id, Index::All, |_| true, |_| false))
}

/// Entries with `start <= timestamp <= end`, newest first.
pub fn trail_by_date_range(
    env: &Env,
    caller: &Address,
    resource_id: &String,
    start: u64,
    end: u64,
) -> Result<Vec<AuditEntry>, ContractError> {
    if start > end {
        return Err(ContractError::InvalidInput);
    }
    require_reader(env, caller, resource_id)?;
    // The index is in append order and ledger time never runs backwards, so
    // the newest-first walk can stop at the first entry older than `start`.
    Ok(collect_desc(
        env,
        resource_id,
        Index::All,
        |entry| entry.timestamp <= end,
        |entry| entry.timestamp < start,
    ))
}

pub fn trail_by_action(
    env: &Env,
    caller: &Address,
    resource_id: &String,
    action: AuditAction,
) -> Result<Vec<AuditEntry>, ContractError> {
    require_reader(env, caller, resource_id)?;
    Ok(collect_desc(
        env,
        resource_id,
        Index::Action(action),
        |_| true,
        |_| false,
    ))
}

pub fn trail_by_submitter(
    env: &Env,
    caller: &Address,
    resource_id: &String,
    submitter: &Address,
) -> Result<Vec<AuditEntry>, ContractError> {
    require_reader(env, caller, resource_id)?;
    Ok(collect_desc(
        env,
        resource_id,
        Index::Submitter(submitter.clone()),
        |_| true,
        |_| false,
    ))
}

pub fn entry_by_tx_id(
    env: &Env,
    caller: &Address,
    resource_id: &String,
    tx_id: &BytesN<32>,
) -> Result<AuditEntry, ContractError> {
    require_reader(env, caller, resource_id)?;
    load_entry(env, resource_id, tx_id).ok_or(ContractError::AuditEntryNotFound)
}

/// Recomputes the hash chain from the first entry to the stored head.
///
/// Returns `false` if any entry is missing, any link is broken, or the final
/// hash differs from the recorded head.
pub fn verify_chain(
    env: &Env,
    caller: &Address,
    resource_id: &String,
) -> Result<bool, ContractError> {
    require_reader(env, caller, resource_id)?;

    let index = Index::All;
    let mut expected = common::zero_digest(env);
    for n in 0..index.len(env, resource_id) {
        let Some(entry) = index
            .get(env, resource_id, n)
            .and_then(|tx_id| load_entry(env, resource_id, &tx_id))
        else {
            return Ok(false);
        };
        if entry.prev_entry_hash != expected {
            return Ok(false);
        }
        expected = entry_hash(env, &entry);
    }

    let head: BytesN<32> = storage::load(env, &DataKey::AuditHead(resource_id.clone()))
        .unwrap_or_else(|| common::zero_digest(env));
    Ok(head == expected)
}
