//! Barrido diario de avisos de vencimiento
//!
//! Busca licencias activas que entran en su ventana de aviso y emite una
//! notificación por cada una. La ventana sale de la configuración de la
//! empresa dueña (`license_warning_days`) o del default global. Un fallo
//! de notificación se aísla: loguea y sigue con la próxima licencia.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::clients::{EventBus, ExpiryWarning, ExpiryWarningSender};
use crate::models::license::LicenseStatus;
use crate::repositories::{CompanyRepository, LicenseRepository, SettingsRepository};
use crate::utils::date::{date_only, days_between, Clock};
use crate::utils::errors::AppResult;

pub const EXPIRY_WARNING_TOPIC: &str = "license:expiry-warning";

/// Resumen de una corrida del barrido de avisos
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WarningSweepOutcome {
    pub examined: usize,
    pub warned: usize,
    pub failed: usize,
}

/// Una licencia está "por vencer" cuando su fin cae dentro de la ventana:
/// `today <= end <= today + window_days`. Lo ya vencido no avisa (eso es
/// terreno del barrido de overdue).
pub fn is_expiring_soon(end: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    end >= today && end <= today + Duration::days(window_days)
}

pub struct LicenseWarningService {
    licenses: Arc<dyn LicenseRepository>,
    companies: Arc<dyn CompanyRepository>,
    settings: Arc<dyn SettingsRepository>,
    clock: Arc<dyn Clock>,
    sender: Arc<dyn ExpiryWarningSender>,
    events: Arc<dyn EventBus>,
    default_warning_days: i32,
}

impl LicenseWarningService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        licenses: Arc<dyn LicenseRepository>,
        companies: Arc<dyn CompanyRepository>,
        settings: Arc<dyn SettingsRepository>,
        clock: Arc<dyn Clock>,
        sender: Arc<dyn ExpiryWarningSender>,
        events: Arc<dyn EventBus>,
        default_warning_days: i32,
    ) -> Self {
        Self {
            licenses,
            companies,
            settings,
            clock,
            sender,
            events,
            default_warning_days,
        }
    }

    pub async fn run_warning_sweep(&self) -> AppResult<WarningSweepOutcome> {
        let active = self.licenses.list_by_status(LicenseStatus::Active).await?;
        let today = date_only(self.clock.now());

        let company_ids: Vec<i32> = active
            .iter()
            .map(|l| l.company_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let companies: HashMap<i32, _> = self
            .companies
            .find_by_ids(&company_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let warning_days: HashMap<i32, i32> = self
            .settings
            .find_by_companies(&company_ids)
            .await?
            .into_iter()
            .filter_map(|s| s.license_warning_days.map(|d| (s.company_id, d)))
            .collect();

        let mut outcome = WarningSweepOutcome {
            examined: active.len(),
            ..Default::default()
        };

        for license in &active {
            let Some(end) = license.end_date else {
                continue;
            };
            let end_only = date_only(end);
            let window = warning_days
                .get(&license.company_id)
                .copied()
                .unwrap_or(self.default_warning_days);

            if !is_expiring_soon(end_only, today, window as i64) {
                continue;
            }

            let Some(company) = companies.get(&license.company_id) else {
                warn!(
                    license_id = license.id,
                    company_id = license.company_id,
                    "⚠️ Licencia por vencer sin empresa asociada, se omite"
                );
                continue;
            };

            let warning = ExpiryWarning {
                license_id: license.id,
                company_id: company.id,
                company_name: company.name.clone(),
                company_email: company.email.clone(),
                days_until_expiry: days_between(today, end_only),
                end_date: end_only,
            };

            if let Err(e) = self.sender.send_expiry_warning(&warning).await {
                error!(
                    license_id = license.id,
                    company_id = company.id,
                    "❌ No se pudo enviar el aviso de vencimiento: {}",
                    e
                );
                outcome.failed += 1;
                continue;
            }

            // Toast de UI, fire-and-forget
            self.events
                .publish(
                    EXPIRY_WARNING_TOPIC,
                    json!({
                        "licenseId": warning.license_id,
                        "companyId": warning.company_id,
                        "daysUntilExpiry": warning.days_until_expiry,
                        "endDate": warning.end_date,
                    }),
                )
                .await;

            outcome.warned += 1;
        }

        info!(
            examined = outcome.examined,
            warned = outcome.warned,
            failed = outcome.failed,
            "🔔 Barrido de avisos completado"
        );
        Ok(outcome)
    }
}
