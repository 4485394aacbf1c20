//! Key encoding utilities for `RocksDB`.
//!
//! Account-keyed column families (subscriptions, trial credits, usage
//! periods) all share the 16-byte account key; the external-identity index
//! keys on the raw identity bytes.

use callcoach_core::{AccountId, ExternalUserId};

/// Create an account key from an account ID.
#[must_use]
pub fn account_key(account_id: &AccountId) -> Vec<u8> {
    account_id.as_bytes().to_vec()
}

/// Create an external-identity index key.
#[must_use]
pub fn external_account_key(external_id: &ExternalUserId) -> Vec<u8> {
    external_id.as_ref().to_vec()
}

/// Decode the account id stored as an external-index value.
///
/// Returns `None` if the value is not exactly 16 bytes.
#[must_use]
pub fn decode_account_id(value: &[u8]) -> Option<AccountId> {
    let bytes: [u8; 16] = value.try_into().ok()?;
    Some(AccountId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}
