//! Notificaciones de vencimiento y eventos realtime
//!
//! El envío real de mails y el socket de UI viven en servicios externos;
//! acá solo están las interfaces y los clientes webhook que les entregan
//! el payload. Cuando no hay webhook configurado se usa la variante de
//! log, útil en desarrollo.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::utils::errors::{AppError, AppResult};

/// Aviso de licencia por vencer, listo para entregar
#[derive(Debug, Clone, Serialize)]
pub struct ExpiryWarning {
    pub license_id: i32,
    pub company_id: i32,
    pub company_name: String,
    pub company_email: String,
    pub days_until_expiry: i64,
    pub end_date: NaiveDate,
}

/// Sender de avisos de vencimiento (mail/notificación; fuera de alcance)
#[async_trait]
pub trait ExpiryWarningSender: Send + Sync {
    async fn send_expiry_warning(&self, warning: &ExpiryWarning) -> AppResult<()>;
}

/// Bus de eventos realtime (toasts de UI). Fire-and-forget: los fallos
/// se tragan con un warn, nunca cortan el flujo que publica.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, topic: &str, payload: serde_json::Value);
}

/// Entrega los avisos vía webhook HTTP al servicio de notificaciones
pub struct WebhookWarningSender {
    client: reqwest::Client,
    url: String,
}

impl WebhookWarningSender {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ExpiryWarningSender for WebhookWarningSender {
    async fn send_expiry_warning(&self, warning: &ExpiryWarning) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(warning)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error sending expiry warning: {}", e)))?;

        response
            .error_for_status()
            .map_err(|e| AppError::ExternalApi(format!("Expiry warning rejected: {}", e)))?;

        Ok(())
    }
}

/// Variante de desarrollo: solo loguea el aviso
#[derive(Debug, Default)]
pub struct LogWarningSender;

#[async_trait]
impl ExpiryWarningSender for LogWarningSender {
    async fn send_expiry_warning(&self, warning: &ExpiryWarning) -> AppResult<()> {
        info!(
            "📧 Aviso de vencimiento: licencia {} de '{}' ({}) vence en {} días ({})",
            warning.license_id,
            warning.company_name,
            warning.company_email,
            warning.days_until_expiry,
            warning.end_date
        );
        Ok(())
    }
}

/// Publica eventos vía webhook al gateway realtime
pub struct WebhookEventBus {
    client: reqwest::Client,
    url: String,
}

impl WebhookEventBus {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl EventBus for WebhookEventBus {
    async fn publish(&self, topic: &str, payload: serde_json::Value) {
        let body = json!({ "topic": topic, "payload": payload });
        match self.client.post(&self.url).json(&body).send().await {
            Ok(response) => {
                if let Err(e) = response.error_for_status() {
                    warn!("⚠️ Evento '{}' rechazado por el gateway: {}", topic, e);
                }
            }
            Err(e) => {
                warn!("⚠️ No se pudo publicar el evento '{}': {}", topic, e);
            }
        }
    }
}

/// Bus nulo para entornos sin gateway realtime
#[derive(Debug, Default)]
pub struct NoopEventBus;

#[async_trait]
impl EventBus for NoopEventBus {
    async fn publish(&self, _topic: &str, _payload: serde_json::Value) {}
}
