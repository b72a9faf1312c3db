use axum::http::StatusCode;
use serde_json::Value;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_check_reports_reachable_store() {
    let server = TestContext::new().server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["calendar_store"], "reachable");
    assert_eq!(body["timezone"], "UTC");
}

#[tokio::test]
async fn test_health_check_degrades_when_store_is_offline() {
    let ctx = TestContext::new();
    ctx.backend.set_offline(true);
    let server = ctx.server();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["calendar_store"], "unreachable");
}

#[tokio::test]
async fn test_version_names_the_service() {
    let server = TestContext::new().server();

    let response = server.get("/version").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["service"], kinder_api::routes::health::SERVICE_NAME);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
