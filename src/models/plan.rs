//! Modelo de Plan
//!
//! Plantilla de precios y features. `amount` es el precio mensual;
//! `amount_annual` solo existe en planes que ofrecen cobro anual.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::company::CompanyType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i32,
    pub name: String,
    /// Precio mensual
    pub amount: Decimal,
    /// Precio anual, si el plan lo ofrece
    pub amount_annual: Option<Decimal>,
    /// Qué tipo de empresa puede contratar este plan
    pub target_type: CompanyType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
