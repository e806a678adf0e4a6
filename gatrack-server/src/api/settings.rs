//! Read-only settings inspection
//!
//! Shows one row of the settings table together with metadata for the keys
//! this service knows about. Admin access only. Nothing here writes settings.

use axum::{
    extract::{Path, State},
    Json,
};
use gatrack_common::db::keys;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Value shown in place of sensitive settings
const REDACTED: &str = "<redacted>";

/// Inspection response
#[derive(Debug, Serialize)]
pub struct SettingView {
    pub key: String,
    pub value: Option<String>,
    pub updated_at: Option<String>,
    pub description: Option<&'static str>,
}

/// Metadata for a known setting key
struct SettingMetadata {
    key: &'static str,
    sensitive: bool,
    description: &'static str,
}

const KNOWN_SETTINGS: &[SettingMetadata] = &[
    SettingMetadata {
        key: keys::TRACKING_ID,
        sensitive: false,
        description: "Google Analytics tracking id served to anonymous clients by GET /google_analytics/id. NULL or missing means no tracking.",
    },
    SettingMetadata {
        key: keys::API_SHARED_SECRET,
        sensitive: true,
        description: "Shared secret (i64) for signing admin requests. Generated on first start; 0 disables authentication.",
    },
];

fn metadata_for(key: &str) -> Option<&'static SettingMetadata> {
    KNOWN_SETTINGS.iter().find(|m| m.key == key)
}

/// GET /settings/:key
pub async fn inspect_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<SettingView>> {
    let record = state
        .settings
        .get_record(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("setting '{}'", key)))?;

    let metadata = metadata_for(&record.key);
    let value = match metadata {
        Some(m) if m.sensitive => record.value.map(|_| REDACTED.to_string()),
        _ => record.value,
    };

    Ok(Json(SettingView {
        key: record.key,
        value,
        updated_at: record.updated_at,
        description: metadata.map(|m| m.description),
    }))
}
