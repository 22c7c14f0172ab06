use std::sync::Arc;

use crate::dto::access_dto::AccessResultResponse;
use crate::services::AccessService;
use crate::utils::errors::AppResult;

pub struct AccessController {
    access: Arc<AccessService>,
}

impl AccessController {
    pub fn new(access: Arc<AccessService>) -> Self {
        Self { access }
    }

    /// Evaluar la cascada para una empresa. Un bloqueo esperado sale como
    /// response 200 con `allowed = false`; empresa inexistente es 404.
    pub async fn evaluate(&self, company_id: i32) -> AppResult<AccessResultResponse> {
        let decision = self.access.evaluate(company_id).await?;
        Ok(decision.into())
    }
}
