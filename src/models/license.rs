//! Modelo de License
//!
//! Una empresa puede acumular varias licencias en el tiempo; para el
//! control de acceso solo cuentan las `active`, y entre varias activas
//! manda la de `end_date` más lejano (una renovación comprada por
//! adelantado no acorta la ventana vigente). El único componente que
//! pasa una licencia a `overdue` es el barrido diario de vencimientos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Estado de una licencia. La cancelación se modela por ausencia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Overdue,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Active => "active",
            LicenseStatus::Overdue => "overdue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(LicenseStatus::Active),
            "overdue" => Some(LicenseStatus::Overdue),
            _ => None,
        }
    }
}

/// Recurrencia de cobro. Determina qué precio del plan aplica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recurrence {
    #[serde(rename = "MENSAL")]
    Mensal,
    #[serde(rename = "ANUAL")]
    Anual,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Mensal => "MENSAL",
            Recurrence::Anual => "ANUAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "MENSAL" => Some(Recurrence::Mensal),
            "ANUAL" => Some(Recurrence::Anual),
            _ => None,
        }
    }
}

/// License - mapea a la tabla licenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: i32,
    pub company_id: i32,
    pub plan_id: i32,
    pub status: LicenseStatus,
    pub recurrence: Recurrence,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    /// Precio capturado al emitir la licencia; override del plan.
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
