// Unit tests for field-level entry edits
//
// - Wire format of the tagged `EntryUpdate` edits
// - Probability edits keep the stage label in step
// - A batch is applied all-or-nothing by the entry service

use std::sync::Arc;

use chrono::NaiveDate;
use revtrack::core::{AppError, Currency, ReportClock};
use revtrack::entries::models::{
    EntryRequest, EntryUpdate, Month, MonthlyRevenue, ProbabilityStage, ProjectType, RevenueKind,
    SalesType,
};
use revtrack::entries::repositories::InMemoryEntryRepository;
use revtrack::entries::EntryService;
use revtrack::modules::auth::models::{AuthenticatedUser, Role};
use rust_decimal_macros::dec;
use serde_json::json;

fn service() -> EntryService {
    EntryService::new(
        Arc::new(InMemoryEntryRepository::new()),
        Currency::PLN,
        ReportClock::utc(),
    )
}

fn admin() -> AuthenticatedUser {
    AuthenticatedUser::new("admin-id", "admin", Role::Admin)
}

fn request() -> EntryRequest {
    serde_json::from_value(json!({
        "probability": "0.25",
        "bd": "Anna Nowak",
        "dl": "Jan Kowalski",
        "pm": "Ewa Lis",
        "accountName": "Acme",
        "projectName": "Rollout",
        "updateDate": "2024-04-01",
        "monthlyRevenues": { "April": { "estimated": "1000", "actual": "0" } }
    }))
    .unwrap()
}

#[test]
fn test_update_wire_format() {
    let updates: Vec<EntryUpdate> = serde_json::from_value(json!([
        { "field": "monthly_revenue", "month": "June", "kind": "actual", "value": "1200.50" },
        { "field": "probability", "value": "0.75" },
        { "field": "type", "value": "EB PT" },
        { "field": "account_name", "value": "Globex" },
        { "field": "project_type", "value": "Opportunity" },
        { "field": "update_date", "value": "2024-06-30" }
    ]))
    .unwrap();

    assert_eq!(
        updates,
        vec![
            EntryUpdate::MonthlyRevenue {
                month: Month::June,
                kind: RevenueKind::Actual,
                value: dec!(1200.50),
            },
            EntryUpdate::Probability { value: dec!(0.75) },
            EntryUpdate::Type { value: SalesType::Potential },
            EntryUpdate::AccountName { value: "Globex".to_string() },
            EntryUpdate::ProjectType { value: ProjectType::Opportunity },
            EntryUpdate::UpdateDate {
                value: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            },
        ]
    );
}

#[test]
fn test_unknown_fields_and_months_are_rejected() {
    assert!(serde_json::from_value::<EntryUpdate>(json!({ "field": "stage", "value": "Won" })).is_err());
    assert!(serde_json::from_value::<EntryUpdate>(json!({
        "field": "monthly_revenue", "month": "Smarch", "kind": "actual", "value": "1"
    }))
    .is_err());
}

#[tokio::test]
async fn test_updates_apply_in_order() {
    let svc = service();
    let user = admin();
    let created = svc.create_entry(request(), &user).await.unwrap();
    assert_eq!(created.stage, ProbabilityStage::Estimation);

    let updated = svc
        .apply_updates(
            &created.id,
            &[
                EntryUpdate::MonthlyRevenue {
                    month: Month::April,
                    kind: RevenueKind::Actual,
                    value: dec!(900),
                },
                EntryUpdate::MonthlyRevenue {
                    month: Month::May,
                    kind: RevenueKind::Estimated,
                    value: dec!(300),
                },
                EntryUpdate::Probability { value: dec!(0.9) },
                EntryUpdate::Pm { value: "  Piotr Zielinski ".to_string() },
            ],
            &user,
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.stage, ProbabilityStage::Legal);
    assert_eq!(updated.pm, "Piotr Zielinski");
    assert_eq!(updated.revenue_for(Month::April), MonthlyRevenue::new(dec!(1000), dec!(900)));
    assert_eq!(updated.revenue_for(Month::May), MonthlyRevenue::new(dec!(300), dec!(0)));
}

#[tokio::test]
async fn test_rejected_batch_leaves_entry_untouched() {
    let svc = service();
    let user = admin();
    let created = svc.create_entry(request(), &user).await.unwrap();

    let result = svc
        .apply_updates(
            &created.id,
            &[
                EntryUpdate::AccountName { value: "Globex".to_string() },
                EntryUpdate::Probability { value: dec!(0.3) },
            ],
            &user,
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let negative = svc
        .apply_updates(
            &created.id,
            &[EntryUpdate::MonthlyRevenue {
                month: Month::April,
                kind: RevenueKind::Estimated,
                value: dec!(-5),
            }],
            &user,
        )
        .await;
    assert!(matches!(negative, Err(AppError::Validation(_))));

    let stored = svc.get_entry(&created.id, &user).await.unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_empty_batch_and_blank_names() {
    let svc = service();
    let user = admin();
    let created = svc.create_entry(request(), &user).await.unwrap();

    assert!(matches!(
        svc.apply_updates(&created.id, &[], &user).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        svc.apply_updates(
            &created.id,
            &[EntryUpdate::ProjectName { value: "   ".to_string() }],
            &user
        )
        .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_unknown_entry_is_not_found() {
    let svc = service();
    let result = svc
        .apply_updates(
            "missing",
            &[EntryUpdate::Bd { value: "x".to_string() }],
            &admin(),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
