//! API description endpoint
//!
//! Lists every route in the route table with its access level and summary.

use std::sync::Arc;

use axum::{Extension, Json};
use serde::Serialize;

use super::RouteDescription;

/// API description response
#[derive(Debug, Serialize)]
pub struct ApiDescription {
    pub module: &'static str,
    pub version: &'static str,
    pub routes: Vec<RouteDescription>,
}

/// GET /describe
pub async fn describe_api(
    Extension(catalog): Extension<Arc<Vec<RouteDescription>>>,
) -> Json<ApiDescription> {
    Json(ApiDescription {
        module: "gatrack-server",
        version: env!("CARGO_PKG_VERSION"),
        routes: catalog.as_ref().clone(),
    })
}
