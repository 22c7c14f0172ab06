//! Evaluador de acceso por jerarquía
//!
//! Decide en cada request si una empresa puede operar, en función de su
//! propio estado de licencias y del estado de su ancestro en la
//! jerarquía. No cachea nada: cada evaluación relee el estado actual,
//! así un vencimiento marcado por el barrido nocturno (o uno que el
//! barrido todavía no marcó) se refleja en el siguiente chequeo.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::company::{Company, CompanyType};
use crate::models::license::{License, LicenseStatus};
use crate::repositories::{CompanyRepository, LicenseRepository};
use crate::utils::date::{date_only, Clock};
use crate::utils::errors::{not_found_error, AppResult};

/// Motivo de bloqueo de la cascada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessBlockReason {
    /// La empresa (o su partner) no tiene licencia vigente con la plataforma
    Platform,
    /// Bloqueo manual aplicado por el partner
    Partner,
}

impl AccessBlockReason {
    pub fn as_code(&self) -> &'static str {
        match self {
            AccessBlockReason::Platform => "ERR_ACCESS_BLOCKED_PLATFORM",
            AccessBlockReason::Partner => "ERR_ACCESS_BLOCKED_PARTNER",
        }
    }
}

/// Resultado tipado de la evaluación. Un bloqueo esperado nunca es un
/// error; los errores de storage sí se propagan (fail-closed en login).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<AccessBlockReason>,
}

impl AccessDecision {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn blocked(reason: AccessBlockReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Regla compartida de vigencia: entre las licencias activas del nodo
/// manda la de `end_date` más lejano (fechas null no extienden ventana),
/// truncado a día calendario UTC contra hoy.
pub fn license_window_valid(licenses: &[License], today: NaiveDate) -> bool {
    licenses
        .iter()
        .filter(|l| l.status == LicenseStatus::Active)
        .filter_map(|l| l.end_date.map(date_only))
        .max()
        .map_or(false, |end| end >= today)
}

pub struct AccessService {
    companies: Arc<dyn CompanyRepository>,
    licenses: Arc<dyn LicenseRepository>,
    clock: Arc<dyn Clock>,
    platform_company_id: i32,
}

impl AccessService {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        licenses: Arc<dyn LicenseRepository>,
        clock: Arc<dyn Clock>,
        platform_company_id: i32,
    ) -> Self {
        Self {
            companies,
            licenses,
            clock,
            platform_company_id,
        }
    }

    /// Cascada de acceso, evaluada top-down por request
    pub async fn evaluate(&self, company_id: i32) -> AppResult<AccessDecision> {
        // La plataforma nunca se bloquea a sí misma
        if company_id == self.platform_company_id {
            return Ok(AccessDecision::allowed());
        }

        let company = self
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| not_found_error("Company", company_id))?;

        match company.company_type {
            CompanyType::Platform => Ok(AccessDecision::allowed()),
            CompanyType::Whitelabel => self.check_node_window(company.id).await,
            CompanyType::Direct => self.evaluate_direct(&company).await,
        }
    }

    async fn evaluate_direct(&self, company: &Company) -> AppResult<AccessDecision> {
        // El bloqueo manual del partner gana siempre, con o sin licencia
        if company.access_blocked_by_parent {
            return Ok(AccessDecision::blocked(AccessBlockReason::Partner));
        }

        match company.parent_company_id {
            // Cliente de un partner: lo que corta es la licencia del
            // whitelabel, no la propia (el whitelabel no tiene padre, así
            // que no hay más cascada hacia arriba)
            Some(parent_id) => match self.companies.find_by_id(parent_id).await? {
                Some(parent) => self.check_node_window(parent.id).await,
                // Padre referenciado pero inexistente: bloqueado
                None => Ok(AccessDecision::blocked(AccessBlockReason::Platform)),
            },
            // Cliente directo de la plataforma: su propia licencia
            None => self.check_node_window(company.id).await,
        }
    }

    async fn check_node_window(&self, node_company_id: i32) -> AppResult<AccessDecision> {
        let licenses = self
            .licenses
            .find_by_company(node_company_id, &[LicenseStatus::Active])
            .await?;
        let today = date_only(self.clock.now());

        if license_window_valid(&licenses, today) {
            Ok(AccessDecision::allowed())
        } else {
            Ok(AccessDecision::blocked(AccessBlockReason::Platform))
        }
    }
}
