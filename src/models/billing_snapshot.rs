//! Snapshot de facturación por partner
//!
//! Clave natural `(partner_id, period_start, period_end)`: recomputar un
//! período es un upsert sobre esa clave, nunca una fila nueva. Los
//! snapshots de períodos pasados quedan inmutables una vez que dejan de
//! ser el período vigente.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartnerBillingSnapshot {
    pub id: i32,
    pub partner_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub child_companies_count: i32,
    pub active_licenses_count: i32,
    /// Total adeudado por el partner en el período, redondeado a 2 decimales
    pub total_amount_due: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Agregados computados para un partner, listos para upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBillingSnapshot {
    pub partner_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub child_companies_count: i32,
    pub active_licenses_count: i32,
    pub total_amount_due: Decimal,
}
