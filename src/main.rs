use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use platform_core::clients::{
    EventBus, ExpiryWarningSender, LogWarningSender, NoopEventBus, WebhookEventBus,
    WebhookWarningSender,
};
use platform_core::config::database::DatabaseConfig;
use platform_core::config::environment::EnvironmentConfig;
use platform_core::jobs;
use platform_core::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use platform_core::repositories::{
    PgBillingSnapshotRepository, PgCompanyRepository, PgLicenseRepository, PgPlanRepository,
    PgSettingsRepository,
};
use platform_core::routes::create_app_router;
use platform_core::services::{
    AccessService, LicenseLifecycleService, LicenseWarningService, PartnerBillingService,
};
use platform_core::state::AppState;
use platform_core::utils::date::SystemClock;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🏢 Platform Core - Access & Licensing API");
    info!("=========================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match DatabaseConfig::default().create_pool().await {
        Ok(pool) => {
            info!("✅ PostgreSQL conectado exitosamente");
            pool
        }
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Repositorios
    let companies = Arc::new(PgCompanyRepository::new(pool.clone()));
    let licenses = Arc::new(PgLicenseRepository::new(pool.clone()));
    let plans = Arc::new(PgPlanRepository::new(pool.clone()));
    let settings = Arc::new(PgSettingsRepository::new(pool.clone()));
    let snapshots = Arc::new(PgBillingSnapshotRepository::new(pool.clone()));
    let clock = Arc::new(SystemClock);

    // Integraciones salientes: webhook si está configurado, log/noop si no
    let warning_sender: Arc<dyn ExpiryWarningSender> = match &config.warning_webhook_url {
        Some(url) => {
            info!("📧 Avisos de vencimiento via webhook: {}", url);
            Arc::new(WebhookWarningSender::new(url.clone()))
        }
        None => Arc::new(LogWarningSender),
    };
    let event_bus: Arc<dyn EventBus> = match &config.events_webhook_url {
        Some(url) => {
            info!("📡 Eventos realtime via webhook: {}", url);
            Arc::new(WebhookEventBus::new(url.clone()))
        }
        None => Arc::new(NoopEventBus),
    };

    // Servicios
    let access = Arc::new(AccessService::new(
        companies.clone(),
        licenses.clone(),
        clock.clone(),
        config.platform_company_id,
    ));
    let lifecycle = Arc::new(LicenseLifecycleService::new(
        licenses.clone(),
        clock.clone(),
    ));
    let warnings = Arc::new(LicenseWarningService::new(
        licenses.clone(),
        companies.clone(),
        settings.clone(),
        clock.clone(),
        warning_sender,
        event_bus,
        config.license_warning_days,
    ));
    let billing = Arc::new(PartnerBillingService::new(
        companies.clone(),
        licenses.clone(),
        plans.clone(),
        snapshots.clone(),
        clock.clone(),
    ));

    let state = AppState::new(config.clone(), access, lifecycle, warnings, billing);

    // Jobs diarios en background
    jobs::spawn_scheduled_jobs(&state);

    // Router de la API
    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = create_app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/access/:company_id - Evaluar cascada de acceso");
    info!("   POST /api/licenses/sweep/overdue - Barrido de vencimientos");
    info!("   POST /api/licenses/sweep/warnings - Barrido de avisos");
    info!("   POST /api/billing/partners/recompute - Recomputar facturación");
    info!("   GET  /api/billing/partners/report - Reporte por partner");
    info!("   GET  /api/billing/partners/snapshots - Snapshots de un período");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
