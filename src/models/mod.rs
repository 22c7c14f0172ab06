//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de dominio que mapean
//! al schema PostgreSQL. Los enums se persisten como texto y se
//! convierten en los repositorios.

pub mod billing_snapshot;
pub mod company;
pub mod company_settings;
pub mod license;
pub mod plan;
