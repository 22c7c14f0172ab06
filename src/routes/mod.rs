//! Rutas de la API
//!
//! Este módulo arma el router principal a partir de los routers por
//! recurso.

pub mod access_routes;
pub mod billing_routes;
pub mod license_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/access", access_routes::create_access_router())
        .nest("/api/licenses", license_routes::create_license_router())
        .nest("/api/billing", billing_routes::create_billing_router())
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "platform-core",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
