//! Google Analytics tracking id endpoint
//!
//! Republishes the stored tracking id so anonymous front-end pages can embed
//! the analytics snippet. Read-only; the setting is written elsewhere.

use axum::{extract::State, Json};
use gatrack_common::db::keys;
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

/// Tracking id response
///
/// `google_analytics_id` is `null` when no tracking id has been configured.
#[derive(Debug, Serialize)]
pub struct TrackingIdResponse {
    pub google_analytics_id: Option<String>,
}

/// GET /google_analytics/id
pub async fn get_tracking_id(State(state): State<AppState>) -> ApiResult<Json<TrackingIdResponse>> {
    let tracking_id = state.settings.get(keys::TRACKING_ID).await?;

    Ok(Json(TrackingIdResponse {
        google_analytics_id: tracking_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_serializes_as_null() {
        let body = serde_json::to_value(TrackingIdResponse {
            google_analytics_id: None,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "google_analytics_id": null }));
    }
}
