use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::billing_snapshot::{NewBillingSnapshot, PartnerBillingSnapshot};
use crate::utils::errors::AppResult;

/// Escritura de snapshots de facturación. El upsert es atómico sobre la
/// clave natural `(partner_id, period_start, period_end)`; recomputar dos
/// veces el mismo período no duplica filas.
#[async_trait]
pub trait BillingSnapshotRepository: Send + Sync {
    async fn upsert(&self, snapshot: &NewBillingSnapshot) -> AppResult<PartnerBillingSnapshot>;
    async fn find_by_period(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<Vec<PartnerBillingSnapshot>>;
}

pub struct PgBillingSnapshotRepository {
    pool: PgPool,
}

impl PgBillingSnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillingSnapshotRepository for PgBillingSnapshotRepository {
    async fn upsert(&self, snapshot: &NewBillingSnapshot) -> AppResult<PartnerBillingSnapshot> {
        let row = sqlx::query_as::<_, PartnerBillingSnapshot>(
            r#"
            INSERT INTO partner_billing_snapshots (
                partner_id, period_start, period_end,
                child_companies_count, active_licenses_count, total_amount_due,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, now(), now())
            ON CONFLICT (partner_id, period_start, period_end)
            DO UPDATE SET
                child_companies_count = EXCLUDED.child_companies_count,
                active_licenses_count = EXCLUDED.active_licenses_count,
                total_amount_due = EXCLUDED.total_amount_due,
                updated_at = now()
            RETURNING *
            "#
        )
        .bind(snapshot.partner_id)
        .bind(snapshot.period_start)
        .bind(snapshot.period_end)
        .bind(snapshot.child_companies_count)
        .bind(snapshot.active_licenses_count)
        .bind(snapshot.total_amount_due)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_period(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<Vec<PartnerBillingSnapshot>> {
        let rows = sqlx::query_as::<_, PartnerBillingSnapshot>(
            r#"
            SELECT * FROM partner_billing_snapshots
            WHERE period_start = $1 AND period_end = $2
            ORDER BY partner_id
            "#
        )
        .bind(period_start)
        .bind(period_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
