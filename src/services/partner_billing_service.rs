//! Agregación de facturación por partner
//!
//! Recalcula, para un período dado, cuánto debe cada partner whitelabel
//! por las licencias de sus empresas hijas. El resultado se persiste como
//! snapshot con clave natural `(partner, período)`: recomputar es un
//! upsert, por lo que la operación es idempotente y puede re-ejecutarse
//! en cualquier momento. Solo el dueño de la plataforma puede invocarla.
//!
//! A diferencia del evaluador de acceso, acá las licencias `overdue`
//! siguen contando: son deuda del partner, no acceso del cliente.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{error, info};

use crate::models::billing_snapshot::{NewBillingSnapshot, PartnerBillingSnapshot};
use crate::models::license::{License, LicenseStatus, Recurrence};
use crate::models::plan::Plan;
use crate::repositories::{
    BillingSnapshotRepository, CompanyRepository, LicenseRepository, PlanRepository,
};
use crate::models::company::CompanyType;
use crate::utils::date::{date_only, days_between, month_bounds, Clock};
use crate::utils::errors::{forbidden_error, AppResult};

/// Resultado de una recomputación
#[derive(Debug, Clone, Serialize)]
pub struct BillingRun {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created: usize,
    pub snapshots: Vec<PartnerBillingSnapshot>,
}

/// Detalle por licencia para el reporte
#[derive(Debug, Clone, Serialize)]
pub struct ChildLicenseDetail {
    pub company_id: i32,
    pub company_name: String,
    pub license_id: i32,
    pub plan_id: i32,
    pub plan_name: Option<String>,
    pub status: LicenseStatus,
    pub recurrence: Recurrence,
    pub amount: Decimal,
    pub end_date: Option<NaiveDate>,
    /// Negativo cuando la licencia ya venció
    pub days_until_expiry: Option<i64>,
}

/// Desglose por partner para el reporte
#[derive(Debug, Clone, Serialize)]
pub struct PartnerBillingReport {
    pub partner_id: i32,
    pub partner_name: String,
    pub child_companies_count: i32,
    pub licenses_count: i32,
    pub total_amount_due: Decimal,
    pub licenses: Vec<ChildLicenseDetail>,
}

/// Precio facturable de una licencia: precio anual del plan si la
/// recurrencia es ANUAL y el plan lo ofrece; si no, el mensual del plan;
/// sin plan, el monto capturado en la licencia; en última instancia 0.
pub fn billable_amount(license: &License, plan: Option<&Plan>) -> Decimal {
    if let Some(plan) = plan {
        if license.recurrence == Recurrence::Anual {
            if let Some(annual) = plan.amount_annual {
                return annual;
            }
        }
        plan.amount
    } else {
        license.amount.unwrap_or(Decimal::ZERO)
    }
}

/// Redondeo monetario a 2 decimales, mitad hacia arriba
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub struct PartnerBillingService {
    companies: Arc<dyn CompanyRepository>,
    licenses: Arc<dyn LicenseRepository>,
    plans: Arc<dyn PlanRepository>,
    snapshots: Arc<dyn BillingSnapshotRepository>,
    clock: Arc<dyn Clock>,
}

impl PartnerBillingService {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        licenses: Arc<dyn LicenseRepository>,
        plans: Arc<dyn PlanRepository>,
        snapshots: Arc<dyn BillingSnapshotRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            companies,
            licenses,
            plans,
            snapshots,
            clock,
        }
    }

    /// Recomputa los snapshots del período (default: mes calendario UTC
    /// en curso). Precondición de autorización: solo la plataforma; un
    /// caller ajeno se rechaza de entrada, sin trabajo parcial.
    pub async fn recompute(
        &self,
        requester_company_id: i32,
        requester_is_platform_owner: bool,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<BillingRun> {
        if !requester_is_platform_owner {
            return Err(forbidden_error(
                "recompute partner billing",
                &format!(
                    "company {} is not the platform owner",
                    requester_company_id
                ),
            ));
        }

        let today = date_only(self.clock.now());
        let (period_start, period_end) = period.unwrap_or_else(|| month_bounds(today));

        let partners = self.companies.list_by_type(CompanyType::Whitelabel).await?;
        let partner_ids: Vec<i32> = partners.iter().map(|p| p.id).collect();
        let children = self.companies.list_children_of(&partner_ids).await?;
        let child_ids: Vec<i32> = children.iter().map(|c| c.id).collect();

        // Las overdue siguen siendo deuda facturable
        let licenses = self
            .licenses
            .find_by_companies(&child_ids, &[LicenseStatus::Active, LicenseStatus::Overdue])
            .await?;
        let plans = self.load_plans(&licenses).await?;

        let mut run = BillingRun {
            period_start,
            period_end,
            created: 0,
            snapshots: Vec::with_capacity(partners.len()),
        };

        for partner in &partners {
            let subtree_ids: HashSet<i32> = children
                .iter()
                .filter(|c| c.parent_company_id == Some(partner.id))
                .map(|c| c.id)
                .collect();
            let partner_licenses: Vec<&License> = licenses
                .iter()
                .filter(|l| subtree_ids.contains(&l.company_id))
                .collect();

            let total: Decimal = partner_licenses
                .iter()
                .map(|l| billable_amount(l, plans.get(&l.plan_id)))
                .sum();

            let snapshot = NewBillingSnapshot {
                partner_id: partner.id,
                period_start,
                period_end,
                child_companies_count: subtree_ids.len() as i32,
                active_licenses_count: partner_licenses.len() as i32,
                total_amount_due: round_currency(total),
            };

            // Sin transacción cruzada: un partner que falla no frena al resto
            match self.snapshots.upsert(&snapshot).await {
                Ok(stored) => {
                    run.created += 1;
                    run.snapshots.push(stored);
                }
                Err(e) => {
                    error!(
                        partner_id = partner.id,
                        "❌ No se pudo guardar el snapshot de facturación: {}", e
                    );
                }
            }
        }

        info!(
            period_start = %run.period_start,
            period_end = %run.period_end,
            partners = partners.len(),
            created = run.created,
            "💰 Recomputación de facturación completada"
        );
        Ok(run)
    }

    /// Reporte por partner con detalle a nivel licencia. La plataforma
    /// puede ver todos los partners o filtrar uno; cualquier otro caller
    /// queda limitado a su propia empresa.
    pub async fn report(
        &self,
        requester_company_id: i32,
        requester_is_platform_owner: bool,
        partner_id: Option<i32>,
    ) -> AppResult<Vec<PartnerBillingReport>> {
        let effective_filter = if requester_is_platform_owner {
            partner_id
        } else {
            Some(requester_company_id)
        };

        let mut partners = self.companies.list_by_type(CompanyType::Whitelabel).await?;
        if let Some(filter) = effective_filter {
            partners.retain(|p| p.id == filter);
        }

        let partner_ids: Vec<i32> = partners.iter().map(|p| p.id).collect();
        let children = self.companies.list_children_of(&partner_ids).await?;
        let child_ids: Vec<i32> = children.iter().map(|c| c.id).collect();
        let licenses = self
            .licenses
            .find_by_companies(&child_ids, &[LicenseStatus::Active, LicenseStatus::Overdue])
            .await?;
        let plans = self.load_plans(&licenses).await?;

        let child_names: HashMap<i32, &str> = children
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        let today = date_only(self.clock.now());

        let mut reports = Vec::with_capacity(partners.len());
        for partner in &partners {
            let subtree_ids: HashSet<i32> = children
                .iter()
                .filter(|c| c.parent_company_id == Some(partner.id))
                .map(|c| c.id)
                .collect();

            let mut details = Vec::new();
            let mut total = Decimal::ZERO;
            for license in licenses.iter().filter(|l| subtree_ids.contains(&l.company_id)) {
                let plan = plans.get(&license.plan_id);
                let amount = billable_amount(license, plan);
                total += amount;

                let end_only = license.end_date.map(date_only);
                details.push(ChildLicenseDetail {
                    company_id: license.company_id,
                    company_name: child_names
                        .get(&license.company_id)
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    license_id: license.id,
                    plan_id: license.plan_id,
                    plan_name: plan.map(|p| p.name.clone()),
                    status: license.status,
                    recurrence: license.recurrence,
                    amount,
                    end_date: end_only,
                    days_until_expiry: end_only.map(|end| days_between(today, end)),
                });
            }

            reports.push(PartnerBillingReport {
                partner_id: partner.id,
                partner_name: partner.name.clone(),
                child_companies_count: subtree_ids.len() as i32,
                licenses_count: details.len() as i32,
                total_amount_due: round_currency(total),
                licenses: details,
            });
        }

        Ok(reports)
    }

    /// Snapshots persistidos de un período (default: mes en curso). Un
    /// caller que no es la plataforma solo ve su propia fila.
    pub async fn snapshots_for_period(
        &self,
        requester_company_id: i32,
        requester_is_platform_owner: bool,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<PartnerBillingSnapshot>> {
        let today = date_only(self.clock.now());
        let (period_start, period_end) = period.unwrap_or_else(|| month_bounds(today));

        let mut snapshots = self.snapshots.find_by_period(period_start, period_end).await?;
        if !requester_is_platform_owner {
            snapshots.retain(|s| s.partner_id == requester_company_id);
        }
        Ok(snapshots)
    }

    async fn load_plans(&self, licenses: &[License]) -> AppResult<HashMap<i32, Plan>> {
        let plan_ids: Vec<i32> = licenses
            .iter()
            .map(|l| l.plan_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let plans = self.plans.find_by_ids(&plan_ids).await?;
        Ok(plans.into_iter().map(|p| (p.id, p)).collect())
    }
}
