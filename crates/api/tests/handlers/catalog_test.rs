use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_time_slots_are_listed_in_day_order() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/time-slots")
        .json(&json!({ "name": "Breakfast", "start_time": "08:00:00", "end_time": "09:00:00" }))
        .await
        .assert_status(StatusCode::CREATED);
    let response = server.get("/api/time-slots").await;

    response.assert_status_ok();
    let names: Vec<String> = response
        .json::<Vec<Value>>()
        .iter()
        .map(|slot| slot["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Breakfast", "Circle time", "Outdoor play"]);
}

#[tokio::test]
async fn test_overlapping_time_slot_is_rejected() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/time-slots")
        .json(&json!({ "name": "Music", "start_time": "09:30:00", "end_time": "10:30:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap_or_default().contains("overlaps"));
}

#[tokio::test]
async fn test_time_slot_update_and_delete() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let outdoor = ctx.slots[1].id;

    let updated = server
        .put(&format!("/api/time-slots/{}", outdoor))
        .json(&json!({ "end_time": "11:30:00" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["end_time"], "11:30:00");

    server
        .delete(&format!("/api/time-slots/{}", outdoor))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/time-slots/{}", outdoor))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activity_lifecycle() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let blank = server
        .post("/api/activities")
        .json(&json!({ "name": "  " }))
        .await;
    blank.assert_status(StatusCode::BAD_REQUEST);

    let created = server
        .post("/api/activities")
        .json(&json!({ "name": "Garden walk", "requires_outdoor": true }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap_or_default().to_string();

    let renamed = server
        .put(&format!("/api/activities/{}", id))
        .json(&json!({ "name": "Nature walk" }))
        .await;
    renamed.assert_status_ok();
    assert_eq!(renamed.json::<Value>()["requires_outdoor"], true);

    let listed = server.get("/api/activities").await.json::<Vec<Value>>();
    assert_eq!(listed.len(), 2);

    server
        .delete(&format!("/api/activities/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_teachers_are_listed() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/teachers").await;

    response.assert_status_ok();
    let teachers = response.json::<Vec<Value>>();
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0]["name"], ctx.teacher.name.as_str());
}
