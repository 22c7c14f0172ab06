//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Se lee una sola vez al arrancar; los servicios reciben los valores por
//! constructor, nunca leen el ambiente directamente.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Empresa que opera la plataforma; nunca se bloquea a sí misma
    pub platform_company_id: i32,
    /// Ventana global de aviso de vencimiento, en días
    pub license_warning_days: i32,
    /// Webhook del servicio de notificaciones (mail); opcional
    pub warning_webhook_url: Option<String>,
    /// Webhook del gateway de eventos realtime; opcional
    pub events_webhook_url: Option<String>,
    pub jobs_enabled: bool,
    pub cors_origins: Vec<String>,
}

impl EnvironmentConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            platform_company_id: env::var("PLATFORM_COMPANY_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("PLATFORM_COMPANY_ID must be a valid number"),
            license_warning_days: env::var("LICENSE_WARNING_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("LICENSE_WARNING_DAYS must be a valid number"),
            warning_webhook_url: env::var("LICENSE_WARNING_WEBHOOK_URL").ok(),
            events_webhook_url: env::var("REALTIME_EVENTS_WEBHOOK_URL").ok(),
            jobs_enabled: env::var("JOBS_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
