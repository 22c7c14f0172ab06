use std::sync::Arc;

use validator::Validate;

use crate::dto::billing_dto::{RecomputeBillingRequest, ReportQuery, SnapshotQuery};
use crate::dto::ApiResponse;
use crate::models::billing_snapshot::PartnerBillingSnapshot;
use crate::services::{BillingRun, PartnerBillingReport, PartnerBillingService};
use crate::utils::errors::AppResult;
use crate::utils::jwt::JwtClaims;

pub struct BillingController {
    billing: Arc<PartnerBillingService>,
    platform_company_id: i32,
}

impl BillingController {
    pub fn new(billing: Arc<PartnerBillingService>, platform_company_id: i32) -> Self {
        Self {
            billing,
            platform_company_id,
        }
    }

    /// Recomputar los snapshots del período. La precondición de
    /// autorización la aplica el servicio: caller ajeno → 403 sin
    /// trabajo parcial.
    pub async fn recompute(
        &self,
        claims: &JwtClaims,
        request: RecomputeBillingRequest,
    ) -> AppResult<ApiResponse<BillingRun>> {
        request.validate()?;
        let run = self
            .billing
            .recompute(
                claims.company_id,
                claims.is_platform_owner(self.platform_company_id),
                request.period(),
            )
            .await?;
        Ok(ApiResponse::success(run))
    }

    pub async fn report(
        &self,
        claims: &JwtClaims,
        query: ReportQuery,
    ) -> AppResult<Vec<PartnerBillingReport>> {
        self.billing
            .report(
                claims.company_id,
                claims.is_platform_owner(self.platform_company_id),
                query.partner_id,
            )
            .await
    }

    pub async fn snapshots(
        &self,
        claims: &JwtClaims,
        query: SnapshotQuery,
    ) -> AppResult<Vec<PartnerBillingSnapshot>> {
        self.billing
            .snapshots_for_period(
                claims.company_id,
                claims.is_platform_owner(self.platform_company_id),
                query.period(),
            )
            .await
    }
}
