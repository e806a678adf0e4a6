//! Signed admin requests
//!
//! An admin request carries `timestamp` (Unix epoch ms) and `hash` query
//! parameters. `hash` is the hex SHA-256 of the signing payload followed by
//! the shared secret in decimal. The payload is the compact JSON object
//! `{"params":{..},"path":".."}` holding the request path and every query
//! parameter except `hash`, keys sorted. A signature is therefore only valid
//! for the exact path and query it was made for.
//!
//! The shared secret lives in the `settings` table under `api_shared_secret`;
//! 0 disables checking. Public routes never go through this module.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::{keys, SettingsStore};

/// Query parameter carrying the request time
pub const TIMESTAMP_PARAM: &str = "timestamp";

/// Query parameter carrying the signature
pub const HASH_PARAM: &str = "hash";

/// Maximum accepted age of a request timestamp
pub const MAX_PAST_MS: i64 = 1000;

/// Maximum accepted clock skew into the future
pub const MAX_FUTURE_MS: i64 = 1;

/// Admin request authentication failures
#[derive(Debug, Error)]
pub enum ApiAuthError {
    #[error("Missing query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid hash")]
    InvalidHash,

    #[error("Invalid shared secret setting: {0}")]
    InvalidSecret(String),

    #[error(transparent)]
    Store(#[from] crate::Error),
}

/// Current Unix time in milliseconds
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Compact JSON the signature is computed over
pub fn signing_payload(path: &str, params: &BTreeMap<String, String>) -> String {
    let signed: BTreeMap<&str, &str> = params
        .iter()
        .filter(|(name, _)| name.as_str() != HASH_PARAM)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    serde_json::json!({ "path": path, "params": signed }).to_string()
}

/// Sign a request path + query parameters
///
/// ```
/// use gatrack_common::api::auth::sign_request;
/// use std::collections::BTreeMap;
///
/// let params = BTreeMap::from([("timestamp".to_string(), "1730000000000".to_string())]);
/// let hash = sign_request("/settings/google_analytics.tracking_id", &params, 42);
/// assert_eq!(hash.len(), 64);
/// ```
pub fn sign_request(path: &str, params: &BTreeMap<String, String>, shared_secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signing_payload(path, params).as_bytes());
    hasher.update(shared_secret.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a request timestamp against `now`
pub fn check_timestamp(timestamp: i64, now: i64) -> Result<(), ApiAuthError> {
    let age = now - timestamp;

    if age > MAX_PAST_MS {
        return Err(ApiAuthError::InvalidTimestamp(format!(
            "{}ms old (max {}ms)",
            age, MAX_PAST_MS
        )));
    }
    if age < -MAX_FUTURE_MS {
        return Err(ApiAuthError::InvalidTimestamp(format!(
            "{}ms in the future (max {}ms)",
            -age, MAX_FUTURE_MS
        )));
    }

    Ok(())
}

/// Verify a signed admin request
pub fn verify_request(
    path: &str,
    params: &BTreeMap<String, String>,
    shared_secret: i64,
    now: i64,
) -> Result<(), ApiAuthError> {
    let raw_timestamp = params
        .get(TIMESTAMP_PARAM)
        .ok_or(ApiAuthError::MissingParameter(TIMESTAMP_PARAM))?;
    let provided = params
        .get(HASH_PARAM)
        .ok_or(ApiAuthError::MissingParameter(HASH_PARAM))?;

    let timestamp: i64 = raw_timestamp.parse().map_err(|_| {
        ApiAuthError::InvalidTimestamp(format!("'{}' is not Unix epoch ms", raw_timestamp))
    })?;
    check_timestamp(timestamp, now)?;

    if !provided.eq_ignore_ascii_case(&sign_request(path, params, shared_secret)) {
        return Err(ApiAuthError::InvalidHash);
    }

    Ok(())
}

/// Load the shared secret, generating one on first start
///
/// A missing or NULL setting is replaced by a random positive secret.
pub async fn load_shared_secret(store: &SettingsStore) -> Result<i64, ApiAuthError> {
    let generated = rand::thread_rng().gen_range(1..=i64::MAX);
    let value = store
        .get_or_insert(keys::API_SHARED_SECRET, &generated.to_string())
        .await?;

    value
        .trim()
        .parse()
        .map_err(|e| ApiAuthError::InvalidSecret(format!("'{}': {}", value, e)))
}
