//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: la configuración y los servicios ya
//! armados con sus repositorios.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::{
    AccessService, LicenseLifecycleService, LicenseWarningService, PartnerBillingService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub access: Arc<AccessService>,
    pub lifecycle: Arc<LicenseLifecycleService>,
    pub warnings: Arc<LicenseWarningService>,
    pub billing: Arc<PartnerBillingService>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        access: Arc<AccessService>,
        lifecycle: Arc<LicenseLifecycleService>,
        warnings: Arc<LicenseWarningService>,
        billing: Arc<PartnerBillingService>,
    ) -> Self {
        Self {
            config,
            access,
            lifecycle,
            warnings,
            billing,
        }
    }
}
