use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::license::{License, LicenseStatus, Recurrence};
use crate::utils::errors::{AppError, AppResult};

/// Acceso a licencias. La única escritura que existe en todo el sistema
/// es el cambio de estado que ejecuta el barrido de vencimientos.
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    async fn find_by_company(
        &self,
        company_id: i32,
        statuses: &[LicenseStatus],
    ) -> AppResult<Vec<License>>;
    async fn find_by_companies(
        &self,
        company_ids: &[i32],
        statuses: &[LicenseStatus],
    ) -> AppResult<Vec<License>>;
    async fn list_by_status(&self, status: LicenseStatus) -> AppResult<Vec<License>>;
    async fn update_status(&self, license_id: i32, status: LicenseStatus) -> AppResult<()>;
}

#[derive(Debug, FromRow)]
struct LicenseRow {
    id: i32,
    company_id: i32,
    plan_id: i32,
    status: String,
    recurrence: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    amount: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LicenseRow {
    fn into_license(self) -> AppResult<License> {
        let status = LicenseStatus::from_str(&self.status).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown license status '{}' for license {}",
                self.status, self.id
            ))
        })?;
        let recurrence = Recurrence::from_str(&self.recurrence).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown recurrence '{}' for license {}",
                self.recurrence, self.id
            ))
        })?;
        Ok(License {
            id: self.id,
            company_id: self.company_id,
            plan_id: self.plan_id,
            status,
            recurrence,
            start_date: self.start_date,
            end_date: self.end_date,
            amount: self.amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn status_labels(statuses: &[LicenseStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

pub struct PgLicenseRepository {
    pool: PgPool,
}

impl PgLicenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LicenseRepository for PgLicenseRepository {
    async fn find_by_company(
        &self,
        company_id: i32,
        statuses: &[LicenseStatus],
    ) -> AppResult<Vec<License>> {
        let rows = sqlx::query_as::<_, LicenseRow>(
            "SELECT * FROM licenses WHERE company_id = $1 AND status = ANY($2) ORDER BY id"
        )
        .bind(company_id)
        .bind(status_labels(statuses))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LicenseRow::into_license).collect()
    }

    async fn find_by_companies(
        &self,
        company_ids: &[i32],
        statuses: &[LicenseStatus],
    ) -> AppResult<Vec<License>> {
        let rows = sqlx::query_as::<_, LicenseRow>(
            "SELECT * FROM licenses WHERE company_id = ANY($1) AND status = ANY($2) ORDER BY id"
        )
        .bind(company_ids.to_vec())
        .bind(status_labels(statuses))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LicenseRow::into_license).collect()
    }

    async fn list_by_status(&self, status: LicenseStatus) -> AppResult<Vec<License>> {
        let rows = sqlx::query_as::<_, LicenseRow>(
            "SELECT * FROM licenses WHERE status = $1 ORDER BY id"
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LicenseRow::into_license).collect()
    }

    async fn update_status(&self, license_id: i32, status: LicenseStatus) -> AppResult<()> {
        sqlx::query(
            "UPDATE licenses SET status = $2, updated_at = now() WHERE id = $1"
        )
        .bind(license_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
