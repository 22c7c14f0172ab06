use std::sync::Arc;

use crate::dto::ApiResponse;
use crate::services::{
    LicenseLifecycleService, LicenseWarningService, OverdueSweepOutcome, WarningSweepOutcome,
};
use crate::utils::errors::AppResult;

/// Disparo manual de los barridos diarios. El scheduler usa los mismos
/// servicios; estos endpoints existen para operación y soporte.
pub struct LicenseController {
    lifecycle: Arc<LicenseLifecycleService>,
    warnings: Arc<LicenseWarningService>,
}

impl LicenseController {
    pub fn new(
        lifecycle: Arc<LicenseLifecycleService>,
        warnings: Arc<LicenseWarningService>,
    ) -> Self {
        Self {
            lifecycle,
            warnings,
        }
    }

    pub async fn trigger_overdue_sweep(&self) -> AppResult<ApiResponse<OverdueSweepOutcome>> {
        let outcome = self.lifecycle.run_overdue_sweep().await?;
        Ok(ApiResponse::success_with_message(
            outcome,
            "Overdue sweep completed".to_string(),
        ))
    }

    pub async fn trigger_warning_sweep(&self) -> AppResult<ApiResponse<WarningSweepOutcome>> {
        let outcome = self.warnings.run_warning_sweep().await?;
        Ok(ApiResponse::success_with_message(
            outcome,
            "Warning sweep completed".to_string(),
        ))
    }
}
