//! Repositorios de acceso a datos
//!
//! Cada agregado expone un trait async y una implementación PostgreSQL.
//! Los servicios dependen de los traits (`Arc<dyn ...>`), lo que permite
//! testearlos sin base de datos.

pub mod billing_snapshot_repository;
pub mod company_repository;
pub mod license_repository;
pub mod plan_repository;
pub mod settings_repository;

pub use billing_snapshot_repository::{BillingSnapshotRepository, PgBillingSnapshotRepository};
pub use company_repository::{CompanyRepository, PgCompanyRepository};
pub use license_repository::{LicenseRepository, PgLicenseRepository};
pub use plan_repository::{PgPlanRepository, PlanRepository};
pub use settings_repository::{PgSettingsRepository, SettingsRepository};
