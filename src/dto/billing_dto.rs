use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Request de recomputación. Sin período explícito se usa el mes
/// calendario UTC en curso; si viene, tienen que venir ambos extremos
/// y en orden.
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_period"))]
pub struct RecomputeBillingRequest {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

impl RecomputeBillingRequest {
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

fn validate_period(req: &RecomputeBillingRequest) -> Result<(), ValidationError> {
    match (req.period_start, req.period_end) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) if start <= end => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("period_start_after_period_end")),
        _ => Err(ValidationError::new("period_requires_both_bounds")),
    }
}

/// Query del reporte por partner
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub partner_id: Option<i32>,
}

/// Query de snapshots persistidos
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

impl SnapshotQuery {
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}
