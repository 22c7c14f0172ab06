//! Services module
//!
//! Este módulo contiene la lógica de negocio: la cascada de acceso,
//! los barridos diarios de licencias y la agregación de facturación
//! por partner.

pub mod access_service;
pub mod license_lifecycle_service;
pub mod license_warning_service;
pub mod partner_billing_service;

pub use access_service::{AccessBlockReason, AccessDecision, AccessService};
pub use license_lifecycle_service::{LicenseLifecycleService, OverdueSweepOutcome};
pub use license_warning_service::{LicenseWarningService, WarningSweepOutcome};
pub use partner_billing_service::{
    BillingRun, ChildLicenseDetail, PartnerBillingReport, PartnerBillingService,
};
