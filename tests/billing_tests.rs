//! Tests de la agregación de facturación por partner.

mod common;

use std::sync::Arc;

use common::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use platform_core::models::company::CompanyType;
use platform_core::models::license::{LicenseStatus, Recurrence};
use platform_core::repositories::LicenseRepository;
use platform_core::services::PartnerBillingService;
use platform_core::utils::errors::AppError;

fn service(
    companies: Arc<InMemoryCompanies>,
    licenses: Arc<InMemoryLicenses>,
    plans: Arc<InMemoryPlans>,
    snapshots: Arc<InMemorySnapshots>,
) -> PartnerBillingService {
    PartnerBillingService::new(companies, licenses, plans, snapshots, fixed_clock())
}

/// Partner 2 con hijos 3 (plan mensual de 100.00) y 4 (plan anual de 1000.00)
fn worked_example() -> (
    Arc<InMemoryCompanies>,
    Arc<InMemoryLicenses>,
    Arc<InMemoryPlans>,
) {
    let companies = InMemoryCompanies::with(vec![
        company(PLATFORM_COMPANY_ID, CompanyType::Platform, None),
        company(2, CompanyType::Whitelabel, None),
        company(3, CompanyType::Direct, Some(2)),
        company(4, CompanyType::Direct, Some(2)),
    ]);

    let monthly = license(20, 3, 30); // plan 1, MENSAL
    let mut annual = license(21, 4, 200);
    annual.plan_id = 2;
    annual.recurrence = Recurrence::Anual;
    let licenses = InMemoryLicenses::with(vec![monthly, annual]);

    let plans = InMemoryPlans::with(vec![
        plan(1, 10000, None),          // 100.00 mensual
        plan(2, 12000, Some(100000)),  // 1000.00 anual
    ]);

    (companies, licenses, plans)
}

#[tokio::test]
async fn worked_example_totals_are_correct() {
    let (companies, licenses, plans) = worked_example();
    let snapshots = InMemorySnapshots::empty();
    let svc = service(companies, licenses, plans, snapshots);

    let run = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    assert_eq!(run.created, 1);
    let snapshot = &run.snapshots[0];
    assert_eq!(snapshot.partner_id, 2);
    assert_eq!(snapshot.child_companies_count, 2);
    assert_eq!(snapshot.active_licenses_count, 2);
    assert_eq!(snapshot.total_amount_due, Decimal::new(110000, 2)); // 1100.00
}

#[tokio::test]
async fn default_period_is_the_current_utc_month() {
    let (companies, licenses, plans) = worked_example();
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    let run = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    // Reloj fijo en 2024-06-15
    assert_eq!(run.period_start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(run.period_end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
}

#[tokio::test]
async fn recompute_twice_upserts_instead_of_duplicating() {
    let (companies, licenses, plans) = worked_example();
    let snapshots = InMemorySnapshots::empty();
    let svc = service(companies, licenses, plans, snapshots.clone());

    let first = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();
    let second = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    assert_eq!(
        first.snapshots[0].total_amount_due,
        second.snapshots[0].total_amount_due
    );
    // Una sola fila por (partner, período)
    assert_eq!(snapshots.all().len(), 1);
}

#[tokio::test]
async fn non_platform_caller_is_rejected_without_partial_work() {
    let (companies, licenses, plans) = worked_example();
    let snapshots = InMemorySnapshots::empty();
    let svc = service(companies, licenses, plans, snapshots.clone());

    let result = svc.recompute(2, false, None).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(snapshots.all().is_empty());
}

#[tokio::test]
async fn overdue_licenses_still_count_as_billable_arrears() {
    let (companies, licenses, plans) = worked_example();
    // La licencia mensual quedó overdue: sigue siendo deuda
    licenses
        .update_status(20, LicenseStatus::Overdue)
        .await
        .unwrap();
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    let run = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    assert_eq!(run.snapshots[0].active_licenses_count, 2);
    assert_eq!(run.snapshots[0].total_amount_due, Decimal::new(110000, 2));
}

#[tokio::test]
async fn partners_only_bill_their_own_subtree() {
    let companies = InMemoryCompanies::with(vec![
        company(2, CompanyType::Whitelabel, None),
        company(5, CompanyType::Whitelabel, None),
        company(3, CompanyType::Direct, Some(2)),
        company(6, CompanyType::Direct, Some(5)),
    ]);
    let licenses = InMemoryLicenses::with(vec![license(20, 3, 30), license(22, 6, 30)]);
    let plans = InMemoryPlans::with(vec![plan(1, 10000, None)]);
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    let run = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    assert_eq!(run.created, 2);
    for snapshot in &run.snapshots {
        assert_eq!(snapshot.child_companies_count, 1);
        assert_eq!(snapshot.total_amount_due, Decimal::new(10000, 2));
    }
}

#[tokio::test]
async fn license_amount_is_used_when_plan_is_missing() {
    let companies = InMemoryCompanies::with(vec![
        company(2, CompanyType::Whitelabel, None),
        company(3, CompanyType::Direct, Some(2)),
    ]);
    let mut orphan = license(20, 3, 30);
    orphan.plan_id = 99; // plan inexistente
    orphan.amount = Some(Decimal::new(4990, 2));
    let licenses = InMemoryLicenses::with(vec![orphan]);
    let svc = service(
        companies,
        licenses,
        InMemoryPlans::with(vec![]),
        InMemorySnapshots::empty(),
    );

    let run = svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();
    assert_eq!(run.snapshots[0].total_amount_due, Decimal::new(4990, 2));
}

#[tokio::test]
async fn explicit_period_is_respected() {
    let (companies, licenses, plans) = worked_example();
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    let run = svc
        .recompute(PLATFORM_COMPANY_ID, true, Some((start, end)))
        .await
        .unwrap();

    assert_eq!(run.period_start, start);
    assert_eq!(run.period_end, end);
}

// -----------------------------------------------------------------------
// Reporte
// -----------------------------------------------------------------------

#[tokio::test]
async fn report_includes_license_level_detail() {
    let (companies, licenses, plans) = worked_example();
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    let reports = svc.report(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.partner_id, 2);
    assert_eq!(report.child_companies_count, 2);
    assert_eq!(report.licenses_count, 2);
    assert_eq!(report.total_amount_due, Decimal::new(110000, 2));

    let monthly = report
        .licenses
        .iter()
        .find(|l| l.license_id == 20)
        .unwrap();
    assert_eq!(monthly.amount, Decimal::new(10000, 2));
    assert_eq!(monthly.days_until_expiry, Some(30));
    assert_eq!(monthly.plan_name.as_deref(), Some("Plan 1"));
}

#[tokio::test]
async fn report_days_until_expiry_goes_negative_when_expired() {
    let companies = InMemoryCompanies::with(vec![
        company(2, CompanyType::Whitelabel, None),
        company(3, CompanyType::Direct, Some(2)),
    ]);
    let mut expired = license(20, 3, -4);
    expired.status = LicenseStatus::Overdue;
    let licenses = InMemoryLicenses::with(vec![expired]);
    let plans = InMemoryPlans::with(vec![plan(1, 10000, None)]);
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    let reports = svc.report(PLATFORM_COMPANY_ID, true, None).await.unwrap();
    assert_eq!(reports[0].licenses[0].days_until_expiry, Some(-4));
}

#[tokio::test]
async fn non_owner_report_is_scoped_to_its_own_company() {
    let companies = InMemoryCompanies::with(vec![
        company(2, CompanyType::Whitelabel, None),
        company(5, CompanyType::Whitelabel, None),
        company(3, CompanyType::Direct, Some(2)),
        company(6, CompanyType::Direct, Some(5)),
    ]);
    let licenses = InMemoryLicenses::with(vec![license(20, 3, 30), license(22, 6, 30)]);
    let plans = InMemoryPlans::with(vec![plan(1, 10000, None)]);
    let svc = service(companies, licenses, plans, InMemorySnapshots::empty());

    // El partner 5 pide el reporte del partner 2: solo ve el suyo
    let reports = svc.report(5, false, Some(2)).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].partner_id, 5);
}

#[tokio::test]
async fn stored_snapshots_are_scoped_for_non_owners() {
    let (companies, licenses, plans) = worked_example();
    let snapshots = InMemorySnapshots::empty();
    let svc = service(companies, licenses, plans, snapshots);

    svc.recompute(PLATFORM_COMPANY_ID, true, None).await.unwrap();

    let all = svc
        .snapshots_for_period(PLATFORM_COMPANY_ID, true, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);

    // Otro partner no ve la fila del partner 2
    let scoped = svc.snapshots_for_period(5, false, None).await.unwrap();
    assert!(scoped.is_empty());

    let own = svc.snapshots_for_period(2, false, None).await.unwrap();
    assert_eq!(own.len(), 1);
}
