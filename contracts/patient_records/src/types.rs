use soroban_sdk::{contracttype, Address, BytesN, Map, String, Vec};

/// Capabilities a grant can carry on a single record.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Permission {
    Read = 1,
    Update = 2,
    Delete = 3,
    Grant = 4,
}

impl Permission {
    /// Every permission, in canonical order.
    pub const ALL: [Permission; 4] = [
        Permission::Read,
        Permission::Update,
        Permission::Delete,
        Permission::Grant,
    ];
}

/// Lifecycle status of a record. `Inactive` is terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RecordStatus {
    Active = 1,
    Inactive = 2,
}

/// A governed record. The contract stores only the content hash, never the
/// content itself.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRecord {
    pub resource_id: String,
    pub data_hash: String,
    pub metadata: Map<String, String>,
    pub owner_org: String,
    pub created_at: u64,
    pub updated_at: u64,
    pub version: u32,
    pub status: RecordStatus,
    pub last_tx_id: BytesN<32>,
    pub last_submitter: Address,
}

/// Permission set held by one identity on one record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrant {
    pub resource_id: String,
    pub grantee: Address,
    pub permissions: Vec<Permission>,
    /// Ledger timestamp at which the grant stops being honoured.
    pub expires_at: Option<u64>,
    pub created_at: u64,
    pub created_by: Address,
    pub updated_at: u64,
    pub updated_by: Address,
}

/// Actions recorded in the audit trail.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AuditAction {
    Register = 1,
    Update = 2,
    Verify = 3,
    Read = 4,
    Delete = 5,
    GrantAccess = 6,
    RevokeAccess = 7,
    UpdateAccessExpiry = 8,
    UpdateAccessPermissions = 9,
}

/// Action-specific payload attached to an audit entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuditDetail {
    None,
    Permissions(Vec<Permission>),
    Expiry(u64),
    ExpiryCleared,
    Verified(bool),
}

/// One immutable entry of a record's audit trail.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditEntry {
    pub resource_id: String,
    pub action: AuditAction,
    pub actor: Address,
    pub timestamp: u64,
    pub tx_id: BytesN<32>,
    pub new_hash: Option<String>,
    pub previous_hash: Option<String>,
    pub target: Option<Address>,
    pub detail: AuditDetail,
    /// sha256 of the XDR encoding of the previous entry for this record
    /// (all zeroes for the first entry).
    pub prev_entry_hash: BytesN<32>,
}

/// Administrator-tunable limits.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryConfig {
    pub max_metadata_entries: u32,
    pub max_field_len: u32,
}
