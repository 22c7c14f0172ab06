use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::company::{Company, CompanyType};
use crate::utils::errors::{AppError, AppResult};

/// Acceso de lectura a la jerarquía de empresas
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Company>>;
    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Company>>;
    async fn list_by_type(&self, company_type: CompanyType) -> AppResult<Vec<Company>>;
    /// Empresas direct cuyo padre está en `parent_ids`
    async fn list_children_of(&self, parent_ids: &[i32]) -> AppResult<Vec<Company>>;
}

/// Fila cruda de la tabla companies; el tipo se persiste como texto
#[derive(Debug, FromRow)]
struct CompanyRow {
    id: i32,
    name: String,
    email: String,
    company_type: String,
    parent_company_id: Option<i32>,
    access_blocked_by_parent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_company(self) -> AppResult<Company> {
        let company_type = CompanyType::from_str(&self.company_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown company type '{}' for company {}",
                self.company_type, self.id
            ))
        })?;
        Ok(Company {
            id: self.id,
            name: self.name,
            email: self.email,
            company_type,
            parent_company_id: self.parent_company_id,
            access_blocked_by_parent: self.access_blocked_by_parent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT * FROM companies WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CompanyRow::into_company).transpose()
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT * FROM companies WHERE id = ANY($1) ORDER BY id"
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CompanyRow::into_company).collect()
    }

    async fn list_by_type(&self, company_type: CompanyType) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT * FROM companies WHERE company_type = $1 ORDER BY id"
        )
        .bind(company_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CompanyRow::into_company).collect()
    }

    async fn list_children_of(&self, parent_ids: &[i32]) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT * FROM companies
            WHERE company_type = 'direct' AND parent_company_id = ANY($1)
            ORDER BY id
            "#
        )
        .bind(parent_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CompanyRow::into_company).collect()
    }
}
