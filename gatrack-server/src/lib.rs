//! gatrack-server library
//!
//! HTTP service publishing the Google Analytics tracking id stored in the
//! settings database, plus health, build info and API description routes.

use std::sync::Arc;

use axum::{middleware, Extension, Router};
use gatrack_common::db::SettingsStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod error;

use api::{AccessGuard, RouteDescription};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Settings store (read-only use)
    pub settings: SettingsStore,
    /// Shared secret for admin routes (0 disables auth)
    pub shared_secret: i64,
}

impl AppState {
    pub fn new(settings: SettingsStore, shared_secret: i64) -> Self {
        Self {
            settings,
            shared_secret,
        }
    }
}

/// Build application router from the route table
///
/// Each route is wrapped with the access check for its declared level.
pub fn build_router(state: AppState) -> Router {
    let endpoints = api::endpoints();

    let catalog: Arc<Vec<RouteDescription>> = Arc::new(
        endpoints
            .iter()
            .map(|endpoint| endpoint.description.clone())
            .collect(),
    );

    let mut router = Router::new();
    for endpoint in endpoints {
        let guard = AccessGuard {
            access: endpoint.description.access,
            shared_secret: state.shared_secret,
        };
        let handler = endpoint
            .handler
            .route_layer(middleware::from_fn_with_state(guard, api::enforce_access));
        router = router.route(endpoint.description.path, handler);
    }

    router
        .layer(Extension(catalog))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
