//! Contract tests for the reports API
//!
//! GET /reports/grand-total, GET /reports/summary and
//! GET /reports/breakdown/{dimension}, each with an optional `as_of`
//! reference date.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use helpers::*;

/// Acme: p=0.5, Jan 1000/900, Jul 2000/2100
/// Globex: p=0.25, EB, Mar 400/0, Sep 800/0
async fn setup() -> (TestServer, String) {
    let srv = spawn_test_server().await;
    let token = admin_token(&srv).await;

    create_entry(
        &srv,
        &token,
        &EntryPayload::new("Acme", "Jan Kowalski")
            .probability("0.5")
            .month("January", "1000", "900")
            .month("July", "2000", "2100")
            .build(),
    )
    .await;
    create_entry(
        &srv,
        &token,
        &EntryPayload::new("Globex", "Ola Wrona")
            .probability("0.25")
            .sales_type("EB")
            .month("March", "400", "0")
            .month("September", "800", "0")
            .build(),
    )
    .await;

    (srv, token)
}

#[actix_web::test]
async fn test_grand_total_report_shape() {
    let (srv, token) = setup().await;

    let (status, body) = get_json(&srv, "/reports/grand-total?as_of=2024-06-15", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["asOf"], "2024-06-15");
    assert_eq!(body["currency"], "PLN");

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let acme = rows.iter().find(|r| r["accountName"] == "Acme").unwrap();
    assert_eq!(acme["stage"], "Proposal");
    assert_decimal(&acme["totals"]["totalEstimated"], "3000");
    assert_decimal(&acme["totals"]["totalActual"], "3000");
    assert_decimal(&acme["totals"]["totalWeighted"], "1450");

    let monthly = body["monthlyTotals"].as_object().unwrap();
    assert_eq!(monthly.len(), 12);
    assert_decimal(&monthly["January"]["estimated"], "1000");
    assert_decimal(&monthly["January"]["actual"], "900");
    assert_decimal(&monthly["March"]["estimated"], "400");
    assert_decimal(&monthly["December"]["estimated"], "0");

    assert_decimal(&body["grandTotals"]["grandTotalEstimated"], "4200");
    assert_decimal(&body["grandTotals"]["grandTotalActual"], "3000");
    assert_decimal(&body["grandTotals"]["grandTotalWeighted"], "1750");
    assert_eq!(body["formatted"]["estimated"], "PLN 4 200.00");
    assert_eq!(body["formatted"]["weighted"], "PLN 1 750.00");
}

#[actix_web::test]
async fn test_reference_date_moves_weighting() {
    let (srv, token) = setup().await;

    let (_, june) = get_json(&srv, "/reports/summary?as_of=2024-06-30", &token).await;
    let (_, july) = get_json(&srv, "/reports/summary?as_of=2024-07-01", &token).await;

    // July's booked actual replaces its estimate once July is reached
    assert_decimal(&june["grandTotals"]["grandTotalWeighted"], "1750");
    assert_decimal(&july["grandTotals"]["grandTotalWeighted"], "1800");
}

#[actix_web::test]
async fn test_summary_report_shape() {
    let (srv, token) = setup().await;

    let (status, body) = get_json(&srv, "/reports/summary?as_of=2024-06-15", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entryCount"], 2);
    assert_eq!(body["asOf"], "2024-06-15");
    assert_decimal(&body["grandTotals"]["grandTotalEstimated"], "4200");
    assert!(body.get("rows").is_none());
}

#[actix_web::test]
async fn test_default_reference_date_is_today() {
    let (srv, token) = setup().await;

    let (status, body) = get_json(&srv, "/reports/summary", &token).await;

    assert_eq!(status, StatusCode::OK);
    let today = chrono::Utc::now().date_naive().to_string();
    // the report may straddle midnight
    let as_of = body["asOf"].as_str().unwrap();
    assert!(as_of == today || as_of < today.as_str(), "{} vs {}", as_of, today);
}

#[actix_web::test]
async fn test_breakdown_by_account() {
    let (srv, token) = setup().await;

    let (status, body) = get_json(&srv, "/reports/breakdown/account", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dimension"], "account");
    assert_eq!(body["title"], "Revenue by Account");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["key"], "Acme");
    assert_decimal(&items[0]["value"], "3000");
    assert_eq!(items[1]["key"], "Globex");
    assert_decimal(&items[1]["value"], "1200");
    assert_decimal(&body["total"], "4200");
}

#[actix_web::test]
async fn test_breakdown_by_business_type_and_dl() {
    let (srv, token) = setup().await;

    let (_, body) = get_json(&srv, "/reports/breakdown/business-type", &token).await;
    let keys: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["EB", "NB"]);

    let (_, body) = get_json(&srv, "/reports/breakdown/dl", &token).await;
    assert_eq!(body["items"][0]["key"], "Jan Kowalski");
    assert_eq!(body["items"][1]["key"], "Ola Wrona");
}

#[actix_web::test]
async fn test_report_input_errors() {
    let (srv, token) = setup().await;

    let (status, body) = get_json(&srv, "/reports/breakdown/region", &token).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&srv, "/reports/summary?as_of=15-06-2024", &token).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&srv, "/reports/grand-total?as_of=2024-02-30", &token).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_empty_pipeline_reports_zero() {
    let srv = spawn_test_server().await;
    let token = admin_token(&srv).await;

    let (status, body) = get_json(&srv, "/reports/grand-total?as_of=2024-06-15", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["rows"].as_array().unwrap().is_empty());
    assert_decimal(&body["grandTotals"]["grandTotalWeighted"], "0");
    assert_eq!(body["formatted"]["actual"], "PLN 0.00");
}
