//! Utilidades JWT
//!
//! Este módulo valida los bearer tokens emitidos por el servicio de
//! autenticación (la emisión vive fuera de este backend). Solo decode
//! y verificación de claims.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // user_id
    pub company_id: i32,    // empresa del usuario
    pub profile: String,    // "admin" | "user"
    pub exp: usize,         // expiration timestamp
    pub iat: usize,         // issued at timestamp
}

impl JwtClaims {
    /// El caller actúa como dueño de la plataforma cuando pertenece a la
    /// empresa plataforma configurada y tiene perfil admin.
    pub fn is_platform_owner(&self, platform_company_id: i32) -> bool {
        self.company_id == platform_company_id && self.profile == "admin"
    }
}

/// Validar un token y extraer los claims
pub fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;
    Ok(token_data.claims)
}

/// Extraer el bearer token del header Authorization y validarlo
pub fn claims_from_headers(headers: &HeaderMap, secret: &str) -> Result<JwtClaims, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    validate_token(token, secret)
}
