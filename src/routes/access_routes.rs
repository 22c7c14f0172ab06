use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::access_controller::AccessController;
use crate::dto::access_dto::AccessResultResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_access_router() -> Router<AppState> {
    Router::new().route("/:company_id", get(evaluate))
}

/// Cascada de acceso: se consulta en cada login y en cada operación
/// privilegiada, siempre contra el estado actual.
async fn evaluate(
    State(state): State<AppState>,
    Path(company_id): Path<i32>,
) -> Result<Json<AccessResultResponse>, AppError> {
    let controller = AccessController::new(state.access.clone());
    let response = controller.evaluate(company_id).await?;
    Ok(Json(response))
}
