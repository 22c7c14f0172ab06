//! Utilidades compartidas
//!
//! Este módulo contiene helpers transversales: manejo de errores,
//! fechas calendario (UTC) y validación de tokens JWT.

pub mod date;
pub mod errors;
pub mod jwt;
