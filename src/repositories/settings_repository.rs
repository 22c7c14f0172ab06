use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::company_settings::CompanySettings;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find_by_companies(&self, company_ids: &[i32]) -> AppResult<Vec<CompanySettings>>;
}

pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn find_by_companies(&self, company_ids: &[i32]) -> AppResult<Vec<CompanySettings>> {
        let rows = sqlx::query_as::<_, CompanySettings>(
            r#"
            SELECT company_id, license_warning_days
            FROM companies_settings
            WHERE company_id = ANY($1)
            "#
        )
        .bind(company_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
