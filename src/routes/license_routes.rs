use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};

use crate::controllers::license_controller::LicenseController;
use crate::controllers::require_platform_owner;
use crate::dto::ApiResponse;
use crate::services::{OverdueSweepOutcome, WarningSweepOutcome};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_license_router() -> Router<AppState> {
    Router::new()
        .route("/sweep/overdue", post(trigger_overdue_sweep))
        .route("/sweep/warnings", post(trigger_warning_sweep))
}

async fn trigger_overdue_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<OverdueSweepOutcome>>, AppError> {
    require_platform_owner(&headers, &state.config)?;
    let controller = LicenseController::new(state.lifecycle.clone(), state.warnings.clone());
    let response = controller.trigger_overdue_sweep().await?;
    Ok(Json(response))
}

async fn trigger_warning_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<WarningSweepOutcome>>, AppError> {
    require_platform_owner(&headers, &state.config)?;
    let controller = LicenseController::new(state.lifecycle.clone(), state.warnings.clone());
    let response = controller.trigger_warning_sweep().await?;
    Ok(Json(response))
}
