use crate::errors::ContractError;
use crate::types::{Permission, RegistryConfig};
use soroban_sdk::{Env, Map, String, Vec};

pub const MAX_RESOURCE_ID_LEN: usize = 64;
pub const MAX_DATA_HASH_LEN: usize = 128;
pub const MAX_ORG_LEN: usize = 64;

/// Resource ids are 1–64 bytes of printable ASCII without spaces.
pub fn validate_resource_id(resource_id: &String) -> Result<(), ContractError> {
    if !common::is_bounded_printable::<MAX_RESOURCE_ID_LEN>(resource_id, false) {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Content hashes are opaque digests: 1–128 printable, non-space bytes.
pub fn validate_data_hash(data_hash: &String) -> Result<(), ContractError> {
    if !common::is_bounded_printable::<MAX_DATA_HASH_LEN>(data_hash, false) {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

pub fn validate_org(org: &String) -> Result<(), ContractError> {
    if !common::is_bounded_printable::<MAX_ORG_LEN>(org, true) {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// Parses one permission token, ignoring case and surrounding whitespace.
pub fn parse_permission(token: &String) -> Result<Permission, ContractError> {
    let normalized = common::normalize_token(token).ok_or(ContractError::InvalidPermission)?;
    match normalized.as_bytes() {
        b"READ" => Ok(Permission::Read),
        b"UPDATE" => Ok(Permission::Update),
        b"DELETE" => Ok(Permission::Delete),
        b"GRANT" => Ok(Permission::Grant),
        _ => Err(ContractError::InvalidPermission),
    }
}

/// Parses a permission list into a duplicate-free set in canonical order.
///
/// An empty list is a missing argument (`InvalidInput`); any unknown token
/// rejects the whole list (`InvalidPermission`).
pub fn parse_permissions(
    env: &Env,
    tokens: &Vec<String>,
) -> Result<Vec<Permission>, ContractError> {
    if tokens.is_empty() {
        return Err(ContractError::InvalidInput);
    }

    let mut seen = [false; Permission::ALL.len()];
    for token in tokens.iter() {
        let permission = parse_permission(&token)?;
        seen[permission as usize - 1] = true;
    }

    let mut permissions = Vec::new(env);
    for (permission, present) in Permission::ALL.iter().zip(seen) {
        if present {
            permissions.push_back(*permission);
        }
    }
    Ok(permissions)
}

/// Checks a metadata map against the configured limits.
pub fn validate_metadata(
    metadata: &Map<String, String>,
    config: &RegistryConfig,
) -> Result<(), ContractError> {
    if metadata.len() > config.max_metadata_entries {
        return Err(ContractError::MetadataFormatError);
    }
    for (key, value) in metadata.iter() {
        if key.is_empty() || key.len() > config.max_field_len {
            return Err(ContractError::MetadataFormatError);
        }
        if value.len() > config.max_field_len {
            return Err(ContractError::MetadataFormatError);
        }
    }
    Ok(())
}

/// Shallow merge: keys in `patch` overwrite keys in `base`.
pub fn merge_metadata(
    base: &Map<String, String>,
    patch: &Map<String, String>,
) -> Map<String, String> {
    let mut merged = base.clone();
    for (key, value) in patch.iter() {
        merged.set(key, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use soroban_sdk::{map, vec};

    #[test]
    fn permissions_are_case_insensitive_and_deduplicated() {
        let env = Env::default();
        let tokens = vec![
            &env,
            String::from_str(&env, "grant"),
            String::from_str(&env, " Read "),
            String::from_str(&env, "READ"),
        ];

        let parsed = parse_permissions(&env, &tokens).unwrap();
        assert_eq!(parsed, vec![&env, Permission::Read, Permission::Grant]);
    }

    #[test]
    fn unknown_permission_token_is_rejected() {
        let env = Env::default();
        let tokens = vec![
            &env,
            String::from_str(&env, "READ"),
            String::from_str(&env, "ADMIN"),
        ];
        assert_eq!(
            parse_permissions(&env, &tokens),
            Err(ContractError::InvalidPermission)
        );
    }

    #[test]
    fn empty_permission_list_is_invalid_input() {
        let env = Env::default();
        assert_eq!(
            parse_permissions(&env, &Vec::new(&env)),
            Err(ContractError::InvalidInput)
        );
    }

    #[test]
    fn resource_id_rules() {
        let env = Env::default();
        assert!(validate_resource_id(&String::from_str(&env, "p1")).is_ok());
        assert!(validate_resource_id(&String::from_str(&env, "")).is_err());
        assert!(validate_resource_id(&String::from_str(&env, "p 1")).is_err());
    }

    #[test]
    fn metadata_limits_are_enforced() {
        let env = Env::default();
        let limits = RegistryConfig {
            max_metadata_entries: 1,
            max_field_len: 4,
        };

        let ok = map![&env, (String::from_str(&env, "k"), String::from_str(&env, "v"))];
        assert!(validate_metadata(&ok, &limits).is_ok());

        let too_many = map![
            &env,
            (String::from_str(&env, "a"), String::from_str(&env, "1")),
            (String::from_str(&env, "b"), String::from_str(&env, "2"))
        ];
        assert_eq!(
            validate_metadata(&too_many, &limits),
            Err(ContractError::MetadataFormatError)
        );

        let empty_key = map![&env, (String::from_str(&env, ""), String::from_str(&env, "v"))];
        assert_eq!(
            validate_metadata(&empty_key, &limits),
            Err(ContractError::MetadataFormatError)
        );

        let long_value = map![
            &env,
            (String::from_str(&env, "k"), String::from_str(&env, "too-long"))
        ];
        assert_eq!(
            validate_metadata(&long_value, &config::defaults()),
            Ok(())
        );
        assert_eq!(
            validate_metadata(&long_value, &limits),
            Err(ContractError::MetadataFormatError)
        );
    }

    #[test]
    fn merge_overwrites_patched_keys_only() {
        let env = Env::default();
        let base = map![
            &env,
            (String::from_str(&env, "a"), String::from_str(&env, "1")),
            (String::from_str(&env, "b"), String::from_str(&env, "2"))
        ];
        let patch = map![&env, (String::from_str(&env, "b"), String::from_str(&env, "3"))];

        let merged = merge_metadata(&base, &patch);
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.get(String::from_str(&env, "a")),
            Some(String::from_str(&env, "1"))
        );
        assert_eq!(
            merged.get(String::from_str(&env, "b")),
            Some(String::from_str(&env, "3"))
        );
    }
}
