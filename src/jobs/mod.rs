//! Jobs programados
//!
//! Tareas diarias en proceso, sin cron externo: cada una duerme hasta su
//! hora UTC fija y corre en loop. No comparten estado entre sí ni con el
//! tráfico de requests; un fallo en una corrida se loguea y el loop sigue
//! vivo para el día siguiente.
//!
//! - 00:00 barrido de vencimientos (active → overdue)
//! - 01:00 recomputación de facturación del mes en curso (upsert
//!   idempotente, re-ejecutar a diario es seguro)
//! - 08:00 barrido de avisos de vencimiento

use chrono::Utc;
use tracing::{error, info};

use crate::state::AppState;
use crate::utils::date::until_next_utc_hour;

const OVERDUE_SWEEP_HOUR: u32 = 0;
const BILLING_RECOMPUTE_HOUR: u32 = 1;
const WARNING_SWEEP_HOUR: u32 = 8;

/// Lanzar los jobs diarios en background
pub fn spawn_scheduled_jobs(state: &AppState) {
    if !state.config.jobs_enabled {
        info!("⏸️ Jobs programados deshabilitados por configuración");
        return;
    }

    let lifecycle = state.lifecycle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_utc_hour(Utc::now(), OVERDUE_SWEEP_HOUR)).await;
            if let Err(e) = lifecycle.run_overdue_sweep().await {
                error!("❌ Falló el barrido de vencimientos: {}", e);
            }
        }
    });

    let billing = state.billing.clone();
    let platform_company_id = state.config.platform_company_id;
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_utc_hour(Utc::now(), BILLING_RECOMPUTE_HOUR)).await;
            // El scheduler actúa como la plataforma
            if let Err(e) = billing.recompute(platform_company_id, true, None).await {
                error!("❌ Falló la recomputación de facturación: {}", e);
            }
        }
    });

    let warnings = state.warnings.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_utc_hour(Utc::now(), WARNING_SWEEP_HOUR)).await;
            if let Err(e) = warnings.run_warning_sweep().await {
                error!("❌ Falló el barrido de avisos: {}", e);
            }
        }
    });

    info!("⏰ Jobs programados: vencimientos 00:00 UTC, facturación 01:00 UTC, avisos 08:00 UTC");
}
