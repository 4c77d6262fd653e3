// Integration test: a pipeline entry through its lifecycle
//
// Create an opportunity, book actuals month by month, move it through the
// stages, and follow the weighted pipeline in the reports.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::{Method, StatusCode};
use helpers::*;
use serde_json::json;

#[actix_web::test]
async fn test_opportunity_to_won_flow() {
    let srv = spawn_test_server().await;
    let token = user_token(&srv, "jankowalski").await;

    // Step 1: qualification-stage opportunity with a twelve-month forecast
    let mut payload = EntryPayload::new("Acme", "Jan Kowalski").probability("0.1");
    for month in [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ] {
        payload = payload.month(month, "1000", "0");
    }
    let entry = create_entry(&srv, &token, &payload.build()).await;
    let path = format!("/revenue-entries/{}", entry["id"].as_str().unwrap());
    assert_eq!(entry["stage"], "Qualification");

    let (_, summary) = get_json(&srv, "/reports/summary?as_of=2024-03-31", &token).await;
    assert_decimal(&summary["grandTotals"]["grandTotalEstimated"], "12000");
    assert_decimal(&summary["grandTotals"]["grandTotalWeighted"], "1200");

    // Step 2: signed, first quarter booked below forecast
    let updates = json!([
        field_update("probability", json!("0.95")),
        month_update("January", "actual", "800"),
        month_update("February", "actual", "900"),
        month_update("March", "actual", "1100"),
    ]);
    let (status, updated) = call(&srv, Method::PATCH, &path, Some(&token), Some(&updates)).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["stage"], "Signed contract");

    let (_, report) = get_json(&srv, "/reports/grand-total?as_of=2024-03-31", &token).await;
    let totals = &report["rows"][0]["totals"];
    assert_decimal(&totals["totalActual"], "2800");
    // (800 + 900 + 1100 + 9 * 1000) * 0.95
    assert_decimal(&totals["totalWeighted"], "11210");

    // Same entry seen from February: March's actual is not yet counted
    let (_, report) = get_json(&srv, "/reports/grand-total?as_of=2024-02-15", &token).await;
    assert_decimal(&report["rows"][0]["totals"]["totalWeighted"], "11115");

    // Step 3: won
    let updates = json!([field_update("probability", json!("1"))]);
    let (_, won) = call(&srv, Method::PATCH, &path, Some(&token), Some(&updates)).await;
    assert_eq!(won["stage"], "Won");

    let (_, summary) = get_json(&srv, "/reports/summary?as_of=2024-03-31", &token).await;
    assert_decimal(&summary["grandTotals"]["grandTotalWeighted"], "11800");
    assert_eq!(summary["formatted"]["weighted"], "PLN 11 800.00");
}

#[actix_web::test]
async fn test_lost_entry_drops_out_of_weighted_pipeline() {
    let srv = spawn_test_server().await;
    let token = admin_token(&srv).await;

    let kept = create_entry(
        &srv,
        &token,
        &EntryPayload::new("Acme", "Jan Kowalski")
            .probability("0.75")
            .month("May", "2000", "0")
            .build(),
    )
    .await;
    let lost = create_entry(
        &srv,
        &token,
        &EntryPayload::new("Globex", "Jan Kowalski")
            .probability("0.5")
            .month("May", "4000", "0")
            .build(),
    )
    .await;
    assert_eq!(kept["stage"], "Negotiation");

    let (_, before) = get_json(&srv, "/reports/summary?as_of=2024-05-31", &token).await;
    assert_decimal(&before["grandTotals"]["grandTotalWeighted"], "3500");

    let path = format!("/revenue-entries/{}", lost["id"].as_str().unwrap());
    let updates = json!([field_update("probability", json!("0"))]);
    let (_, body) = call(&srv, Method::PATCH, &path, Some(&token), Some(&updates)).await;
    assert_eq!(body["stage"], "Lost");

    let (_, after) = get_json(&srv, "/reports/summary?as_of=2024-05-31", &token).await;
    assert_decimal(&after["grandTotals"]["grandTotalWeighted"], "1500");
    // the forecast itself is unchanged
    assert_decimal(&after["grandTotals"]["grandTotalEstimated"], "6000");

    let (_, breakdown) = get_json(&srv, "/reports/breakdown/account", &token).await;
    assert_decimal(&breakdown["items"][1]["value"], "4000");

    let (status, _) = call(&srv, Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, summary) = get_json(&srv, "/reports/summary?as_of=2024-05-31", &token).await;
    assert_eq!(summary["entryCount"], 1);
}
