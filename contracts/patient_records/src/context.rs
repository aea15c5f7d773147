use crate::storage::DataKey;
use soroban_sdk::{Address, BytesN, Env};

/// Everything an operation knows about the transaction it runs in.
///
/// Built once per auditable invocation and passed by reference to the
/// record, access and audit modules. Nothing here outlives the invocation.
#[derive(Clone, Debug)]
pub struct TxContext {
    /// Authenticated identity that submitted the transaction.
    pub caller: Address,
    /// Deterministic, per-invocation transaction id.
    pub tx_id: BytesN<32>,
    /// Ledger close time; the only clock operations may consult.
    pub timestamp: u64,
}

impl TxContext {
    /// Authenticates `caller` and allocates the transaction id.
    ///
    /// The id is the sha256 of this contract's address, the ledger sequence,
    /// a contract-wide counter and the ledger timestamp, so every replica
    /// derives the same value and no two invocations share one.
    pub fn begin(env: &Env, caller: Address) -> Self {
        caller.require_auth();

        let counter = env
            .storage()
            .instance()
            .get::<_, u64>(&DataKey::TxCounter)
            .unwrap_or(0)
            .saturating_add(1);
        env.storage().instance().set(&DataKey::TxCounter, &counter);
        common::extend_instance(env);

        let timestamp = env.ledger().timestamp();
        let msg = common::build_tx_message(
            env,
            &env.current_contract_address(),
            env.ledger().sequence(),
            counter,
            timestamp,
        );

        Self {
            caller,
            tx_id: common::sha256(env, &msg),
            timestamp,
        }
    }
}
