//! Soporte compartido de tests: repositorios en memoria, reloj fijo y
//! fixtures. Los servicios dependen de traits, así que acá no hay
//! PostgreSQL: cada store es un Mutex sobre vectores.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use platform_core::clients::{EventBus, ExpiryWarning, ExpiryWarningSender};
use platform_core::models::billing_snapshot::{NewBillingSnapshot, PartnerBillingSnapshot};
use platform_core::models::company::{Company, CompanyType};
use platform_core::models::company_settings::CompanySettings;
use platform_core::models::license::{License, LicenseStatus, Recurrence};
use platform_core::models::plan::Plan;
use platform_core::repositories::{
    BillingSnapshotRepository, CompanyRepository, LicenseRepository, PlanRepository,
    SettingsRepository,
};
use platform_core::utils::date::Clock;
use platform_core::utils::errors::{AppError, AppResult};

pub const PLATFORM_COMPANY_ID: i32 = 1;

/// Día fijo de los tests: 2024-06-15
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(now()))
}

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

pub fn company(id: i32, company_type: CompanyType, parent: Option<i32>) -> Company {
    Company {
        id,
        name: format!("Empresa {}", id),
        email: format!("admin{}@empresa.test", id),
        company_type,
        parent_company_id: parent,
        access_blocked_by_parent: false,
        created_at: now() - Duration::days(90),
        updated_at: now() - Duration::days(1),
    }
}

/// Licencia con vencimiento relativo a hoy (días); plan 1, mensual
pub fn license(id: i32, company_id: i32, end_offset_days: i64) -> License {
    License {
        id,
        company_id,
        plan_id: 1,
        status: LicenseStatus::Active,
        recurrence: Recurrence::Mensal,
        start_date: now() - Duration::days(30),
        end_date: Some(now() + Duration::days(end_offset_days)),
        amount: None,
        created_at: now() - Duration::days(30),
        updated_at: now() - Duration::days(30),
    }
}

pub fn plan(id: i32, monthly_cents: i64, annual_cents: Option<i64>) -> Plan {
    Plan {
        id,
        name: format!("Plan {}", id),
        amount: Decimal::new(monthly_cents, 2),
        amount_annual: annual_cents.map(|c| Decimal::new(c, 2)),
        target_type: CompanyType::Direct,
        created_at: now() - Duration::days(365),
        updated_at: now() - Duration::days(365),
    }
}

// -----------------------------------------------------------------------
// Stores en memoria
// -----------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryCompanies {
    companies: Mutex<Vec<Company>>,
}

impl InMemoryCompanies {
    pub fn with(companies: Vec<Company>) -> Arc<Self> {
        Arc::new(Self {
            companies: Mutex::new(companies),
        })
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanies {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list_by_type(&self, company_type: CompanyType) -> AppResult<Vec<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.company_type == company_type)
            .cloned()
            .collect())
    }

    async fn list_children_of(&self, parent_ids: &[i32]) -> AppResult<Vec<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.company_type == CompanyType::Direct)
            .filter(|c| c.parent_company_id.map_or(false, |p| parent_ids.contains(&p)))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryLicenses {
    licenses: Mutex<Vec<License>>,
    /// Ids cuyo update_status debe fallar (tests de aislamiento)
    pub fail_update_for: Mutex<HashSet<i32>>,
}

impl InMemoryLicenses {
    pub fn with(licenses: Vec<License>) -> Arc<Self> {
        Arc::new(Self {
            licenses: Mutex::new(licenses),
            fail_update_for: Mutex::new(HashSet::new()),
        })
    }

    pub fn snapshot(&self) -> Vec<License> {
        self.licenses.lock().unwrap().clone()
    }

    pub fn status_of(&self, id: i32) -> Option<LicenseStatus> {
        self.licenses
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.status)
    }
}

#[async_trait]
impl LicenseRepository for InMemoryLicenses {
    async fn find_by_company(
        &self,
        company_id: i32,
        statuses: &[LicenseStatus],
    ) -> AppResult<Vec<License>> {
        Ok(self
            .licenses
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.company_id == company_id && statuses.contains(&l.status))
            .cloned()
            .collect())
    }

    async fn find_by_companies(
        &self,
        company_ids: &[i32],
        statuses: &[LicenseStatus],
    ) -> AppResult<Vec<License>> {
        Ok(self
            .licenses
            .lock()
            .unwrap()
            .iter()
            .filter(|l| company_ids.contains(&l.company_id) && statuses.contains(&l.status))
            .cloned()
            .collect())
    }

    async fn list_by_status(&self, status: LicenseStatus) -> AppResult<Vec<License>> {
        Ok(self
            .licenses
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn update_status(&self, license_id: i32, status: LicenseStatus) -> AppResult<()> {
        if self.fail_update_for.lock().unwrap().contains(&license_id) {
            return Err(AppError::Internal(format!(
                "simulated storage failure for license {}",
                license_id
            )));
        }
        let mut licenses = self.licenses.lock().unwrap();
        match licenses.iter_mut().find(|l| l.id == license_id) {
            Some(license) => {
                license.status = status;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "License with id '{}' not found",
                license_id
            ))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPlans {
    plans: Mutex<Vec<Plan>>,
}

impl InMemoryPlans {
    pub fn with(plans: Vec<Plan>) -> Arc<Self> {
        Arc::new(Self {
            plans: Mutex::new(plans),
        })
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlans {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Plan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Plan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySettings {
    settings: Mutex<Vec<CompanySettings>>,
}

impl InMemorySettings {
    pub fn with(settings: Vec<CompanySettings>) -> Arc<Self> {
        Arc::new(Self {
            settings: Mutex::new(settings),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettings {
    async fn find_by_companies(&self, company_ids: &[i32]) -> AppResult<Vec<CompanySettings>> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .filter(|s| company_ids.contains(&s.company_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySnapshots {
    rows: Mutex<Vec<PartnerBillingSnapshot>>,
    next_id: Mutex<i32>,
}

impl InMemorySnapshots {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        })
    }

    pub fn all(&self) -> Vec<PartnerBillingSnapshot> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillingSnapshotRepository for InMemorySnapshots {
    async fn upsert(&self, snapshot: &NewBillingSnapshot) -> AppResult<PartnerBillingSnapshot> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|r| {
            r.partner_id == snapshot.partner_id
                && r.period_start == snapshot.period_start
                && r.period_end == snapshot.period_end
        }) {
            existing.child_companies_count = snapshot.child_companies_count;
            existing.active_licenses_count = snapshot.active_licenses_count;
            existing.total_amount_due = snapshot.total_amount_due;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        let mut next_id = self.next_id.lock().unwrap();
        let row = PartnerBillingSnapshot {
            id: *next_id,
            partner_id: snapshot.partner_id,
            period_start: snapshot.period_start,
            period_end: snapshot.period_end,
            child_companies_count: snapshot.child_companies_count,
            active_licenses_count: snapshot.active_licenses_count,
            total_amount_due: snapshot.total_amount_due,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        *next_id += 1;
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_period(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<Vec<PartnerBillingSnapshot>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.period_start == period_start && r.period_end == period_end)
            .cloned()
            .collect())
    }
}

// -----------------------------------------------------------------------
// Sender y bus de eventos grabadores
// -----------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingWarningSender {
    pub sent: Mutex<Vec<ExpiryWarning>>,
    /// Licencias cuyo envío debe fallar (tests de aislamiento)
    pub fail_for_license: Mutex<HashSet<i32>>,
}

impl RecordingWarningSender {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent_license_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|w| w.license_id)
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl ExpiryWarningSender for RecordingWarningSender {
    async fn send_expiry_warning(&self, warning: &ExpiryWarning) -> AppResult<()> {
        if self
            .fail_for_license
            .lock()
            .unwrap()
            .contains(&warning.license_id)
        {
            return Err(AppError::ExternalApi(format!(
                "simulated notifier failure for license {}",
                warning.license_id
            )));
        }
        self.sent.lock().unwrap().push(warning.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEventBus {
    pub events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingEventBus {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, topic: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
    }
}
