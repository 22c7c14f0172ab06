//! Fechas calendario UTC
//!
//! Todas las comparaciones de vencimiento del sistema operan sobre días
//! calendario UTC (`NaiveDate`), nunca sobre timestamps completos. Este
//! módulo concentra esa truncación y la aritmética de períodos.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Fuente de tiempo inyectable. Los servicios nunca llaman `Utc::now()`
/// directamente para que los tests puedan fijar el día.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reloj del sistema (producción)
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Truncar un timestamp al día calendario UTC
pub fn date_only(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Días entre dos fechas calendario (`to - from`, puede ser negativo)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Límites del mes calendario que contiene `day`: `[primer día, último día]`
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let (next_year, next_month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(day);
    (first, last)
}

/// Duración hasta la próxima ocurrencia de `hour:00` UTC
pub fn until_next_utc_hour(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let today_at = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| now.naive_utc());
    let target = if now.naive_utc() < today_at {
        today_at
    } else {
        today_at + Duration::days(1)
    };
    (target - now.naive_utc())
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(60))
}
