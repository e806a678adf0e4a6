//! HTTP API handlers and the route table

pub mod access;
pub mod analytics;
pub mod buildinfo;
pub mod describe;
pub mod health;
pub mod settings;

use axum::routing::{get, MethodRouter};
use serde::Serialize;

use crate::AppState;

pub use access::{enforce_access, Access, AccessGuard};
pub use analytics::get_tracking_id;
pub use buildinfo::get_build_info;
pub use describe::describe_api;
pub use health::health_check;
pub use settings::inspect_setting;

/// Public description of one route, served by `/describe`
#[derive(Debug, Clone, Serialize)]
pub struct RouteDescription {
    pub method: &'static str,
    pub path: &'static str,
    pub access: Access,
    pub summary: &'static str,
}

/// Route table entry: description plus handler
pub struct Endpoint {
    pub description: RouteDescription,
    pub handler: MethodRouter<AppState>,
}

impl Endpoint {
    fn get(
        path: &'static str,
        access: Access,
        summary: &'static str,
        handler: MethodRouter<AppState>,
    ) -> Self {
        Self {
            description: RouteDescription {
                method: "GET",
                path,
                access,
                summary,
            },
            handler,
        }
    }
}

/// All routes served by gatrack-server
pub fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get(
            "/google_analytics/id",
            Access::Public,
            "Public url for getting the Google Analytics tracking id.",
            get(get_tracking_id),
        ),
        Endpoint::get(
            "/health",
            Access::Public,
            "Health check.",
            get(health_check),
        ),
        Endpoint::get(
            "/build_info",
            Access::Public,
            "Version and build identification.",
            get(get_build_info),
        ),
        Endpoint::get(
            "/describe",
            Access::Public,
            "Describe the routes of this API.",
            get(describe_api),
        ),
        Endpoint::get(
            "/settings/:key",
            Access::Admin,
            "Inspect one stored setting (read-only).",
            get(inspect_setting),
        ),
    ]
}
