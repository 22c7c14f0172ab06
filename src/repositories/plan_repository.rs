use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::company::CompanyType;
use crate::models::plan::Plan;
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Plan>>;
    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Plan>>;
}

#[derive(Debug, FromRow)]
struct PlanRow {
    id: i32,
    name: String,
    amount: Decimal,
    amount_annual: Option<Decimal>,
    target_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlanRow {
    fn into_plan(self) -> AppResult<Plan> {
        let target_type = CompanyType::from_str(&self.target_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown target type '{}' for plan {}",
                self.target_type, self.id
            ))
        })?;
        Ok(Plan {
            id: self.id,
            name: self.name,
            amount: self.amount,
            amount_annual: self.amount_annual,
            target_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Plan>> {
        let row = sqlx::query_as::<_, PlanRow>(
            "SELECT * FROM plans WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlanRow::into_plan).transpose()
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Plan>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            "SELECT * FROM plans WHERE id = ANY($1) ORDER BY id"
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PlanRow::into_plan).collect()
    }
}
