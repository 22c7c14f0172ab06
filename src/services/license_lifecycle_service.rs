//! Barrido diario de vencimientos
//!
//! Pasa a `overdue` toda licencia activa cuyo `end_date` (día calendario
//! UTC) ya quedó atrás. Cada transición es independiente: un fallo sobre
//! una licencia se loguea y no corta el resto del lote. Re-ejecutarlo sin
//! licencias nuevas vencidas es un no-op.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};

use crate::models::license::{License, LicenseStatus};
use crate::repositories::LicenseRepository;
use crate::utils::date::{date_only, Clock};
use crate::utils::errors::AppResult;

/// Resumen de una corrida del barrido
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OverdueSweepOutcome {
    pub examined: usize,
    pub transitioned: usize,
    pub failed: usize,
}

/// Selección pura de candidatas: activas con end_date estrictamente
/// anterior a hoy. Las que vencen hoy todavía no pasan a overdue.
pub fn licenses_past_due(licenses: &[License], today: NaiveDate) -> Vec<&License> {
    licenses
        .iter()
        .filter(|l| l.status == LicenseStatus::Active)
        .filter(|l| match l.end_date {
            Some(end) => date_only(end) < today,
            None => false,
        })
        .collect()
}

pub struct LicenseLifecycleService {
    licenses: Arc<dyn LicenseRepository>,
    clock: Arc<dyn Clock>,
}

impl LicenseLifecycleService {
    pub fn new(licenses: Arc<dyn LicenseRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { licenses, clock }
    }

    pub async fn run_overdue_sweep(&self) -> AppResult<OverdueSweepOutcome> {
        let candidates = self.licenses.list_by_status(LicenseStatus::Active).await?;
        let today = date_only(self.clock.now());

        let mut outcome = OverdueSweepOutcome {
            examined: candidates.len(),
            ..Default::default()
        };

        for license in licenses_past_due(&candidates, today) {
            match self
                .licenses
                .update_status(license.id, LicenseStatus::Overdue)
                .await
            {
                Ok(()) => outcome.transitioned += 1,
                Err(e) => {
                    error!(
                        license_id = license.id,
                        company_id = license.company_id,
                        "❌ No se pudo pasar la licencia a overdue: {}",
                        e
                    );
                    outcome.failed += 1;
                }
            }
        }

        info!(
            examined = outcome.examined,
            transitioned = outcome.transitioned,
            failed = outcome.failed,
            "🔁 Barrido de vencimientos completado"
        );
        Ok(outcome)
    }
}
