//! Integration tests for calendar events and recurring series.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p cadence-server)
//!
//! Run with: cargo test -p cadence-integration-tests -- --ignored

use chrono::{Datelike, NaiveDate, Weekday};
use reqwest::StatusCode;
use serde_json::{Value, json};

use cadence_integration_tests::{TestUser, body_json};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_single_event_roundtrip() {
    let alice = TestUser::register("Alice").await;

    let resp = alice
        .post(
            "/api/events",
            &json!({"title": "Dentist", "date": "2026-09-14", "start_time": "10:00:00"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let created = created.as_array().expect("events array");
    assert_eq!(created.len(), 1);
    assert!(created[0]["parent_id"].is_null());

    let event_id = created[0]["id"].as_i64().expect("event id");
    let resp = alice.get(&format!("/api/events/{event_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched["title"], "Dentist");
    assert_eq!(fetched["date"], "2026-09-14");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_daily_series_materializes_count_occurrences() {
    let alice = TestUser::register("Alice").await;

    let resp = alice
        .post(
            "/api/events",
            &json!({
                "title": "Medication",
                "date": "2026-09-01",
                "recurrence": {"frequency": "daily", "count": 5}
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let series = body_json(resp).await;
    let series = series.as_array().expect("events array");

    assert_eq!(series.len(), 5);
    let dates: Vec<&str> = series
        .iter()
        .filter_map(|e| e["date"].as_str())
        .collect();
    assert_eq!(
        dates,
        ["2026-09-01", "2026-09-02", "2026-09-03", "2026-09-04", "2026-09-05"]
    );

    // All occurrences share one series ID; only the first carries the rule
    let parent_id = series[0]["parent_id"].as_str().expect("parent id");
    assert!(series.iter().all(|e| e["parent_id"] == parent_id));
    assert_eq!(series[0]["is_parent"], true);
    assert!(series[0]["recurrence"].is_object());
    assert!(series[1..].iter().all(|e| e["is_parent"] == false));
    assert!(series[1..].iter().all(|e| e["recurrence"].is_null()));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_weekly_series_follows_weekday_set() {
    let alice = TestUser::register("Alice").await;

    // 2026-09-07 is a Monday; Mondays and Wednesdays should alternate
    let resp = alice
        .post(
            "/api/events",
            &json!({
                "title": "Gym",
                "date": "2026-09-07",
                "recurrence": {"frequency": "weekly", "days_of_week": [1, 3], "count": 6}
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let series = body_json(resp).await;
    let series = series.as_array().expect("events array");

    assert_eq!(series.len(), 6);
    let weekdays: Vec<Weekday> = series.iter().map(weekday_of).collect();
    assert_eq!(
        weekdays,
        [
            Weekday::Mon,
            Weekday::Wed,
            Weekday::Mon,
            Weekday::Wed,
            Weekday::Mon,
            Weekday::Wed
        ]
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_weekday_rejected() {
    let alice = TestUser::register("Alice").await;

    let resp = alice
        .post(
            "/api/events",
            &json!({
                "title": "Broken",
                "date": "2026-09-07",
                "recurrence": {"frequency": "weekly", "days_of_week": [7], "count": 3}
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_series_update_scope_future() {
    let alice = TestUser::register("Alice").await;

    let series = create_daily_series(&alice, "2026-10-01", 4, "Review").await;
    let third_id = series[2]["id"].as_i64().expect("event id");

    // Retitle the third occurrence and everything after it
    let resp = alice
        .put(
            &format!("/api/events/{third_id}?scope=future"),
            &json!({"title": "Retro", "date": "2026-10-03"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let result = body_json(resp).await;
    assert_eq!(result["updated"], 2);

    let listed = list_events(&alice, "2026-10-01", "2026-10-31").await;
    let titles: Vec<&str> = listed
        .iter()
        .filter_map(|e| e["title"].as_str())
        .collect();
    assert_eq!(titles, ["Review", "Review", "Retro", "Retro"]);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_series_delete_scopes() {
    let alice = TestUser::register("Alice").await;

    // scope=single removes one occurrence, the rest survive
    let series = create_daily_series(&alice, "2026-11-01", 5, "Walk").await;
    let second_id = series[1]["id"].as_i64().expect("event id");
    let resp = alice
        .delete(&format!("/api/events/{second_id}?scope=single"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["deleted"], 1);
    assert_eq!(list_events(&alice, "2026-11-01", "2026-11-30").await.len(), 4);

    // scope=future removes the addressed date onward
    let series = create_daily_series(&alice, "2026-12-01", 5, "Run").await;
    let fourth_id = series[3]["id"].as_i64().expect("event id");
    let resp = alice
        .delete(&format!("/api/events/{fourth_id}?scope=future"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["deleted"], 2);
    let left = list_events(&alice, "2026-12-01", "2026-12-31").await;
    let dates: Vec<&str> = left.iter().filter_map(|e| e["date"].as_str()).collect();
    assert_eq!(dates, ["2026-12-01", "2026-12-02", "2026-12-03"]);

    // scope=all removes the whole series from any occurrence
    let series = create_daily_series(&alice, "2027-01-01", 5, "Swim").await;
    let third_id = series[2]["id"].as_i64().expect("event id");
    let resp = alice
        .delete(&format!("/api/events/{third_id}?scope=all"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["deleted"], 5);
    assert!(list_events(&alice, "2027-01-01", "2027-01-31").await.is_empty());
}

// ============================================================================
// Helpers
// ============================================================================

async fn create_daily_series(
    user: &TestUser,
    start: &str,
    count: u32,
    title: &str,
) -> Vec<Value> {
    let resp = user
        .post(
            "/api/events",
            &json!({
                "title": title,
                "date": start,
                "recurrence": {"frequency": "daily", "count": count}
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp)
        .await
        .as_array()
        .expect("events array")
        .clone()
}

async fn list_events(user: &TestUser, from: &str, to: &str) -> Vec<Value> {
    let resp = user.get(&format!("/api/events?from={from}&to={to}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp)
        .await
        .as_array()
        .expect("events array")
        .clone()
}

fn weekday_of(event: &Value) -> Weekday {
    event["date"]
        .as_str()
        .and_then(|d| d.parse::<NaiveDate>().ok())
        .expect("event date")
        .weekday()
}
