//! Modelo de Company
//!
//! Las empresas forman una jerarquía de tres niveles: la plataforma,
//! los partners whitelabel y sus clientes directos. Una empresa direct
//! cuelga de un whitelabel vía `parent_company_id`; un whitelabel no
//! tiene padre (reporta a la plataforma).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tipo de empresa dentro de la jerarquía
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    Platform,
    Whitelabel,
    Direct,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Platform => "platform",
            CompanyType::Whitelabel => "whitelabel",
            CompanyType::Direct => "direct",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "platform" => Some(CompanyType::Platform),
            "whitelabel" => Some(CompanyType::Whitelabel),
            "direct" => Some(CompanyType::Direct),
            _ => None,
        }
    }
}

/// Company principal - mapea a la tabla companies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company_type: CompanyType,
    pub parent_company_id: Option<i32>,
    /// Bloqueo manual aplicado por la empresa padre, independiente
    /// del estado de licencias.
    pub access_blocked_by_parent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
