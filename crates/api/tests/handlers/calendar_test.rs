use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Datelike, Days};
use kinder_core::models::{
    calendar::{CalendarEntry, EntryKey},
    class::ClassSummary,
};
use kinder_db::mock::MockBackend;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TEMPLATE_MONDAY, TestContext, date, future_monday, server_for};

fn template_week_start() -> String {
    let (y, m, d) = TEMPLATE_MONDAY;
    date(y, m, d).to_string()
}

fn propagation_body(weeks: u64) -> Value {
    let start = future_monday(0);
    let end = future_monday(weeks - 1)
        .checked_add_days(Days::new(6))
        .expect("date in range");
    json!({
        "template_week_start": template_week_start(),
        "start_date": start,
        "end_date": end,
        "weekdays": [1],
    })
}

#[tokio::test]
async fn test_week_view_lists_slots_and_entries() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get(&format!(
            "/api/classes/{}/calendar?week_start={}",
            ctx.class.id,
            template_week_start()
        ))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["slots"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["entries"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["entries"][0]["activity_id"], ctx.activity.id.to_string());
}

#[tokio::test]
async fn test_week_view_of_unknown_class_is_not_found() {
    let server = TestContext::new().server();

    let response = server
        .get(&format!(
            "/api/classes/{}/calendar?week_start=2024-01-01",
            Uuid::new_v4()
        ))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_entry_accepts_nested_slot_reference() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let day = future_monday(0);

    let response = server
        .put(&format!("/api/classes/{}/calendar/entries", ctx.class.id))
        .json(&json!({
            "date": day,
            "slot": { "slot": { "_id": ctx.slots[1].id } },
            "activity": { "_id": ctx.activity.id },
        }))
        .await;

    response.assert_status_ok();
    let stored = ctx
        .backend
        .entry(EntryKey {
            class_id: ctx.class.id,
            date: day,
            slot_id: ctx.slots[1].id,
        })
        .await;
    assert_eq!(
        stored.and_then(|entry| entry.teacher_id),
        Some(ctx.teacher.id)
    );
}

#[tokio::test]
async fn test_edit_entry_reports_missing_slot_first() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .put(&format!("/api/classes/{}/calendar/entries", ctx.class.id))
        .json(&json!({ "date": "2020-01-01" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Missing required field: slot_id"
    );
}

#[tokio::test]
async fn test_edit_entry_in_the_past_is_rejected() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .put(&format!("/api/classes/{}/calendar/entries", ctx.class.id))
        .json(&json!({
            "date": "2020-01-01",
            "slot_id": ctx.slots[0].id,
            "activity_id": ctx.activity.id,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_entry_surfaces_teacher_conflict() {
    let ctx = TestContext::new();
    let day = future_monday(0);
    ctx.add_neighbour_class(day, 0).await;
    let server = ctx.server();

    let response = server
        .put(&format!("/api/classes/{}/calendar/entries", ctx.class.id))
        .json(&json!({
            "date": day,
            "slot_id": ctx.slots[0].id,
            "activity_id": ctx.activity.id,
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["conflict"]["kind"], "teacher_double_booked");
    assert_eq!(
        body["error"],
        "Scheduling conflict: slot time overlaps an existing entry for this teacher"
    );
}

#[tokio::test]
async fn test_edit_entry_for_unknown_class_is_not_found() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .put(&format!("/api/classes/{}/calendar/entries", Uuid::new_v4()))
        .json(&json!({
            "date": future_monday(0),
            "slot_id": ctx.slots[0].id,
            "activity_id": ctx.activity.id,
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_propagation_copies_template_forward() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post(&format!("/api/classes/{}/calendar/propagate", ctx.class.id))
        .json(&propagation_body(3))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    // Three Mondays, two slots each.
    assert_eq!(body["outcome"], "success");
    assert_eq!(body["written"], 6);
    assert_eq!(body["refresh"], false);
    assert_eq!(body["message"], "Scheduled 6 occurrence(s).");

    let entries = ctx.backend.entries_for(ctx.class.id).await;
    let copied: Vec<_> = entries
        .iter()
        .filter(|entry| entry.date >= future_monday(0))
        .collect();
    assert_eq!(copied.len(), 3);
    assert!(copied.iter().all(|entry| {
        entry.date.weekday() == chrono::Weekday::Mon && entry.slot_id == ctx.slots[0].id
    }));
}

#[tokio::test]
async fn test_propagation_with_conflicts_is_partial() {
    let ctx = TestContext::new();
    let first_monday = future_monday(0);
    ctx.add_neighbour_class(first_monday, 0).await;
    let server = ctx.server();

    let response = server
        .post(&format!("/api/classes/{}/calendar/propagate", ctx.class.id))
        .json(&propagation_body(2))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["outcome"], "partial");
    assert_eq!(body["success_count"], 3);
    assert_eq!(body["error_count"], 1);
    assert_eq!(body["refresh"], true);
    assert_eq!(body["errors"][0]["date"], first_monday.to_string());
    assert_eq!(body["errors"][0]["conflict"]["kind"], "teacher_double_booked");
}

#[tokio::test]
async fn test_propagation_rejected_everywhere_is_failure_without_counts() {
    let ctx = TestContext::new();
    let (y, m, d) = TEMPLATE_MONDAY;
    let orphan = ClassSummary {
        id: Uuid::new_v4(),
        name: "Ladybirds".to_string(),
        end_date: None,
        homeroom_teacher_id: None,
    };
    ctx.backend.insert_class(orphan.clone()).await;
    for slot in &ctx.slots {
        ctx.backend
            .insert_entry(CalendarEntry {
                class_id: orphan.id,
                date: date(y, m, d),
                slot_id: slot.id,
                activity_id: Some(ctx.activity.id),
                teacher_id: None,
            })
            .await;
    }
    let server = ctx.server();

    let response = server
        .post(&format!("/api/classes/{}/calendar/propagate", orphan.id))
        .json(&propagation_body(1))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["outcome"], "failure");
    assert_eq!(body["refresh"], false);
    assert!(body.get("error_count").is_none());
    assert!(body.get("success_count").is_none());
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["errors"][0]["conflict"]["kind"], "missing_homeroom_teacher");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("homeroom teacher"))
    );
}

#[tokio::test]
async fn test_propagation_starting_in_the_past_is_rejected() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post(&format!("/api/classes/{}/calendar/propagate", ctx.class.id))
        .json(&json!({
            "template_week_start": template_week_start(),
            "start_date": "2020-01-06",
            "end_date": future_monday(0),
            "weekdays": [1],
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.backend.entries_for(ctx.class.id).await.len(), 1);
}

#[tokio::test]
async fn test_propagating_an_empty_week_is_unprocessable() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post(&format!("/api/classes/{}/calendar/propagate", ctx.class.id))
        .json(&json!({
            "template_week_start": "2023-06-05",
            "start_date": future_monday(0),
            "end_date": future_monday(1),
            "weekdays": [1],
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_preview_reports_without_writing() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let mut body = propagation_body(2);
    body["weekdays"] = json!([1, 3]);

    let response = server
        .post(&format!(
            "/api/classes/{}/calendar/propagate/preview",
            ctx.class.id
        ))
        .json(&body)
        .await;

    response.assert_status_ok();
    let preview = response.json::<Value>();
    assert_eq!(preview["target_dates"].as_array().map(Vec::len), Some(2));
    assert_eq!(preview["skipped_dates"].as_array().map(Vec::len), Some(2));
    assert_eq!(preview["directive_count"], 4);
    assert_eq!(preview["assign_count"], 2);
    assert_eq!(preview["clear_count"], 2);
    assert_eq!(ctx.backend.entries_for(ctx.class.id).await.len(), 1);
}

#[tokio::test]
async fn test_store_outage_during_propagation_is_bad_gateway() {
    let class = ClassSummary {
        id: Uuid::new_v4(),
        name: "Sunflowers".to_string(),
        end_date: None,
        homeroom_teacher_id: None,
    };
    let slot = crate::test_utils::slot("Circle time", 9, 10);
    let (y, m, d) = TEMPLATE_MONDAY;
    let template = vec![CalendarEntry {
        class_id: class.id,
        date: date(y, m, d),
        slot_id: slot.id,
        activity_id: Some(Uuid::new_v4()),
        teacher_id: None,
    }];

    let mut backend = MockBackend::new();
    let found = class.clone();
    backend
        .expect_find_class()
        .returning(move |_| Ok(Some(found.clone())));
    backend
        .expect_time_slots()
        .returning(move || Ok(vec![slot.clone()]));
    backend
        .expect_template_week_entries()
        .returning(move |_, _| Ok(template.clone()));
    backend
        .expect_bulk_upsert()
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection reset by peer")));
    let server = server_for(Arc::new(backend));

    let response = server
        .post(&format!("/api/classes/{}/calendar/propagate", class.id))
        .json(&propagation_body(1))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}
