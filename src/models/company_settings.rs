//! Configuración por empresa
//!
//! Solo el subconjunto que consume este backend: la ventana de aviso
//! de vencimiento de licencias. Cuando es null aplica el default global.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanySettings {
    pub company_id: i32,
    pub license_warning_days: Option<i32>,
}
