//! Controllers
//!
//! Orquestación entre DTOs y servicios. La validación del bearer token
//! vive acá: los handlers extraen claims y los controllers deciden.

pub mod access_controller;
pub mod billing_controller;
pub mod license_controller;

use axum::http::HeaderMap;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{forbidden_error, AppResult};
use crate::utils::jwt::{claims_from_headers, JwtClaims};

/// Extraer y validar claims del request
pub fn authenticated_claims(
    headers: &HeaderMap,
    config: &EnvironmentConfig,
) -> AppResult<JwtClaims> {
    claims_from_headers(headers, &config.jwt_secret)
}

/// Claims + verificación de que el caller es el dueño de la plataforma
pub fn require_platform_owner(
    headers: &HeaderMap,
    config: &EnvironmentConfig,
) -> AppResult<JwtClaims> {
    let claims = authenticated_claims(headers, config)?;
    if !claims.is_platform_owner(config.platform_company_id) {
        return Err(forbidden_error(
            "perform this operation",
            "requires the platform owner",
        ));
    }
    Ok(claims)
}
