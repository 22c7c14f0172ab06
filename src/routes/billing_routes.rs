use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::authenticated_claims;
use crate::controllers::billing_controller::BillingController;
use crate::dto::billing_dto::{RecomputeBillingRequest, ReportQuery, SnapshotQuery};
use crate::dto::ApiResponse;
use crate::models::billing_snapshot::PartnerBillingSnapshot;
use crate::services::{BillingRun, PartnerBillingReport};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_billing_router() -> Router<AppState> {
    Router::new()
        .route("/partners/recompute", post(recompute))
        .route("/partners/report", get(report))
        .route("/partners/snapshots", get(snapshots))
}

async fn recompute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecomputeBillingRequest>,
) -> Result<Json<ApiResponse<BillingRun>>, AppError> {
    let claims = authenticated_claims(&headers, &state.config)?;
    let controller = BillingController::new(state.billing.clone(), state.config.platform_company_id);
    let response = controller.recompute(&claims, request).await?;
    Ok(Json(response))
}

async fn report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<PartnerBillingReport>>, AppError> {
    let claims = authenticated_claims(&headers, &state.config)?;
    let controller = BillingController::new(state.billing.clone(), state.config.platform_company_id);
    let response = controller.report(&claims, query).await?;
    Ok(Json(response))
}

async fn snapshots(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SnapshotQuery>,
) -> Result<Json<Vec<PartnerBillingSnapshot>>, AppError> {
    let claims = authenticated_claims(&headers, &state.config)?;
    let controller = BillingController::new(state.billing.clone(), state.config.platform_company_id);
    let response = controller.snapshots(&claims, query).await?;
    Ok(Json(response))
}
