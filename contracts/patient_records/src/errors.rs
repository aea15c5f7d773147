use crate::events;
use soroban_sdk::{contracttype, Address, Env, String};

/// Error categories for classifying different types of errors
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Validation errors: missing or malformed arguments, unknown tokens
    Validation = 1,
    /// Authorization errors: missing, expired or insufficient capabilities
    Authorization = 2,
    /// Not found errors: record, grant or audit entry lookup failures
    NotFound = 3,
    /// State conflict errors: duplicate registration, stale hash, terminal status
    StateConflict = 4,
}

/// Error severity levels indicating the impact and urgency of errors
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    /// Low severity: non-critical errors, informational
    Low = 1,
    /// Medium severity: important but recoverable errors
    Medium = 2,
    /// High severity: significant errors requiring attention
    High = 3,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ErrorContext {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
    pub user: Option<Address>,
    pub resource_id: Option<String>,
    pub timestamp: u64,
    pub retryable: bool,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    RecordNotFound = 5,
    GrantNotFound = 6,
    AuditEntryNotFound = 7,
    RecordAlreadyExists = 8,
    PermissionDenied = 9,
    IntegrityConflict = 10,
    InvalidPermission = 11,
    MetadataFormatError = 12,
    RecordInactive = 13,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::InvalidInput
            | ContractError::InvalidPermission
            | ContractError::MetadataFormatError => ErrorCategory::Validation,
            ContractError::Unauthorized | ContractError::PermissionDenied => {
                ErrorCategory::Authorization
            }
            ContractError::RecordNotFound
            | ContractError::GrantNotFound
            | ContractError::AuditEntryNotFound => ErrorCategory::NotFound,
            ContractError::RecordAlreadyExists
            | ContractError::IntegrityConflict
            | ContractError::RecordInactive => ErrorCategory::StateConflict,
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::InvalidInput
            | ContractError::InvalidPermission
            | ContractError::MetadataFormatError
            | ContractError::RecordNotFound
            | ContractError::GrantNotFound
            | ContractError::AuditEntryNotFound
            | ContractError::RecordAlreadyExists => ErrorSeverity::Low,
            ContractError::Unauthorized
            | ContractError::PermissionDenied
            | ContractError::RecordInactive => ErrorSeverity::Medium,
            ContractError::IntegrityConflict => ErrorSeverity::High,
        }
    }

    /// Returns whether this error is retryable.
    /// A stale `previous_hash` can succeed once the caller re-reads the record.
    pub fn retryable(&self) -> bool {
        matches!(self, ContractError::IntegrityConflict)
    }

    /// Returns a human-readable error message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::Unauthorized => "Caller is not the contract administrator",
            ContractError::InvalidInput => "Missing or malformed argument",
            ContractError::RecordNotFound => "Record not found",
            ContractError::GrantNotFound => "Access grant not found",
            ContractError::AuditEntryNotFound => "Audit entry not found",
            ContractError::RecordAlreadyExists => "Record with this ID already exists",
            ContractError::PermissionDenied => "Caller lacks the required permission",
            ContractError::IntegrityConflict => {
                "Previous hash does not match the stored record hash"
            }
            ContractError::InvalidPermission => {
                "Invalid permission, expected READ, UPDATE, DELETE or GRANT"
            }
            ContractError::MetadataFormatError => "Metadata is malformed or exceeds limits",
            ContractError::RecordInactive => "Record has been deleted",
        }
    }
}

/// Creates an ErrorContext structure from an error and optional user/resource information.
pub fn create_error_context(
    env: &Env,
    error: ContractError,
    user: Option<Address>,
    resource_id: Option<String>,
) -> ErrorContext {
    ErrorContext {
        category: error.category(),
        severity: error.severity(),
        message: String::from_str(env, error.message()),
        user,
        resource_id,
        timestamp: env.ledger().timestamp(),
        retryable: error.retryable(),
    }
}

/// Publishes an `ERROR` event for `error` and hands it back for propagation.
///
/// The event is only observable in simulation: a failing invocation discards
/// its events together with its writes.
pub fn report(
    env: &Env,
    error: ContractError,
    user: Option<Address>,
    resource_id: Option<String>,
) -> ContractError {
    let context = create_error_context(env, error, user, resource_id);
    events::publish_error(env, error as u32, context);
    error
}

/// Passes `result` through, publishing the `ERROR` event when it failed.
///
/// Every entry point routes its outcome through here once, so each failure is
/// reported exactly once no matter which module raised it.
pub fn reported<T>(
    env: &Env,
    result: Result<T, ContractError>,
    user: Option<&Address>,
    resource_id: Option<&String>,
) -> Result<T, ContractError> {
    result.map_err(|error| report(env, error, user.cloned(), resource_id.cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_are_stable() {
        assert_eq!(ContractError::NotInitialized as u32, 1);
        assert_eq!(ContractError::InvalidInput as u32, 4);
        assert_eq!(ContractError::RecordNotFound as u32, 5);
        assert_eq!(ContractError::PermissionDenied as u32, 9);
        assert_eq!(ContractError::IntegrityConflict as u32, 10);
        assert_eq!(ContractError::MetadataFormatError as u32, 12);
        assert_eq!(ContractError::RecordInactive as u32, 13);
    }

    #[test]
    fn not_found_family_shares_category() {
        for err in [
            ContractError::RecordNotFound,
            ContractError::GrantNotFound,
            ContractError::AuditEntryNotFound,
        ] {
            assert_eq!(err.category(), ErrorCategory::NotFound);
            assert!(!err.retryable());
        }
    }

    #[test]
    fn reported_passes_results_through() {
        let env = Env::default();
        let contract_id = env.register(crate::PatientRecordsContract, ());
        let rid = String::from_str(&env, "p1");

        env.as_contract(&contract_id, || {
            assert_eq!(reported(&env, Ok(7u32), None, Some(&rid)), Ok(7));
            assert_eq!(
                reported::<u32>(&env, Err(ContractError::InvalidInput), None, Some(&rid)),
                Err(ContractError::InvalidInput)
            );
        });
    }

    #[test]
    fn error_context_carries_taxonomy() {
        let env = Env::default();
        let rid = String::from_str(&env, "p1");

        let context =
            create_error_context(&env, ContractError::RecordNotFound, None, Some(rid.clone()));
        assert_eq!(context.category, ErrorCategory::NotFound);
        assert_eq!(context.severity, ErrorSeverity::Low);
        assert_eq!(context.resource_id, Some(rid));
        assert!(!context.retryable);
        assert_eq!(
            context.message,
            String::from_str(&env, ContractError::RecordNotFound.message())
        );
    }

    #[test]
    fn only_integrity_conflict_is_retryable() {
        assert!(ContractError::IntegrityConflict.retryable());
        assert!(!ContractError::PermissionDenied.retryable());
        assert_eq!(
            ContractError::IntegrityConflict.category(),
            ErrorCategory::StateConflict
        );
    }
}
