use serde::Serialize;

use crate::services::AccessDecision;

/// Resultado de la evaluación de acceso para la API. El `code` viaja tal
/// cual al frontend, que lo traduce a mensaje localizado.
#[derive(Debug, Serialize)]
pub struct AccessResultResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AccessDecision> for AccessResultResponse {
    fn from(decision: AccessDecision) -> Self {
        Self {
            allowed: decision.allowed,
            code: decision.reason.map(|r| r.as_code().to_string()),
        }
    }
}
