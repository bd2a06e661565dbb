//! End-to-end tests of the `/api/todos` router over an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::TimeDelta;
use serde_json::{Value, json};
use std::sync::Arc;
use todo_service_core::TodoService;
use todo_service_testing::{InMemoryTodoStore, ManualClock, test_instant};
use todo_service_web::{AppState, CORRELATION_ID_HEADER, build_router};

struct Api {
    server: TestServer,
    store: InMemoryTodoStore,
    clock: ManualClock,
}

fn api() -> Api {
    let store = InMemoryTodoStore::new();
    let clock = ManualClock::new(test_instant());
    let service = TodoService::new(Arc::new(store.clone()), Arc::new(clock.clone()));
    let server = TestServer::new(build_router(AppState::new(service))).unwrap();

    Api {
        server,
        store,
        clock,
    }
}

async fn create(api: &Api, body: Value) -> Value {
    let response = api.server.post("/api/todos").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

fn titles(body: &Value) -> Vec<String> {
    let mut titles: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn lifecycle_create_toggle_update_delete() {
    let api = api();

    let created = create(
        &api,
        json!({"title": "Buy milk", "priority": "HIGH", "tags": ["errand", "errand"]}),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    assert_eq!(created["completed"], false);
    assert_eq!(created["priority"], "HIGH");
    assert_eq!(created["tags"], json!(["errand"]));
    assert_eq!(created["description"], Value::Null);
    assert_eq!(created["createdAt"], "2025-01-01T00:00:00");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    api.clock.advance(TimeDelta::minutes(1));
    let toggled = api
        .server
        .patch(&format!("/api/todos/{id}/toggle"))
        .await
        .json::<Value>();
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["updatedAt"], "2025-01-01T00:01:00");

    api.clock.advance(TimeDelta::minutes(1));
    let updated = api
        .server
        .put(&format!("/api/todos/{id}"))
        .json(&json!({"description": "2 litres"}))
        .await
        .json::<Value>();
    assert_eq!(updated["description"], "2 litres");
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["createdAt"], "2025-01-01T00:00:00");

    let fetched = api.server.get(&format!("/api/todos/{id}")).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>(), updated);

    api.server
        .delete(&format!("/api/todos/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    api.server
        .get(&format!("/api/todos/{id}"))
        .await
        .assert_status_not_found();
    api.server
        .delete(&format!("/api/todos/{id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn create_defaults_priority_and_lists_all() {
    let api = api();
    create(&api, json!({"title": "A"})).await;
    create(&api, json!({"title": "B", "dueDate": "2025-02-01T09:30:00"})).await;

    let response = api.server.get("/api/todos").await;
    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(titles(&body), vec!["A", "B"]);
    assert!(body.as_array().unwrap().iter().all(|t| t["priority"] == "MEDIUM"));
    assert_eq!(api.store.len().unwrap(), 2);
}

#[tokio::test]
async fn validation_failures_list_offending_fields() {
    let api = api();

    let response = api
        .server
        .post("/api/todos")
        .json(&json!({"title": "  ", "description": "d".repeat(1001)}))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["description", "title"]);
    assert!(api.store.is_empty().unwrap());
}

#[tokio::test]
async fn missing_title_and_malformed_bodies_are_rejected() {
    let api = api();

    api.server
        .post("/api/todos")
        .json(&json!({"description": "no title"}))
        .await
        .assert_status_bad_request();

    api.server
        .post("/api/todos")
        .json(&json!({"title": "A", "priority": "CRITICAL"}))
        .await
        .assert_status_bad_request();

    api.server
        .post("/api/todos")
        .json(&json!({"title": "A", "dueDate": "tomorrow"}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let api = api();

    for response in [
        api.server.get("/api/todos/missing").await,
        api.server
            .put("/api/todos/missing")
            .json(&json!({"title": "x"}))
            .await,
        api.server.patch("/api/todos/missing/toggle").await,
    ] {
        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn search_uses_the_first_present_criterion() {
    let api = api();
    create(&api, json!({"title": "Learn Redis", "priority": "LOW", "tags": ["db"]})).await;
    create(&api, json!({"title": "Walk dog", "priority": "HIGH", "tags": ["home"]})).await;

    let by_term = api
        .server
        .post("/api/todos/search")
        .json(&json!({"searchTerm": "redis", "priority": "HIGH"}))
        .await
        .json::<Value>();
    assert_eq!(titles(&by_term), vec!["Learn Redis"]);

    let by_priority = api
        .server
        .post("/api/todos/search")
        .json(&json!({"priority": "HIGH", "tag": "db"}))
        .await
        .json::<Value>();
    assert_eq!(titles(&by_priority), vec!["Walk dog"]);

    let everything = api
        .server
        .post("/api/todos/search")
        .json(&json!({}))
        .await
        .json::<Value>();
    assert_eq!(titles(&everything), vec!["Learn Redis", "Walk dog"]);
}

#[tokio::test]
async fn filters_by_status_priority_and_tag() {
    let api = api();
    let done = create(&api, json!({"title": "Done", "priority": "URGENT", "tags": ["work"]})).await;
    create(&api, json!({"title": "Open", "tags": ["home"]})).await;
    api.server
        .patch(&format!("/api/todos/{}/toggle", done["id"].as_str().unwrap()))
        .await
        .assert_status_ok();

    let completed = api.server.get("/api/todos/status/true").await.json::<Value>();
    assert_eq!(titles(&completed), vec!["Done"]);

    let urgent = api.server.get("/api/todos/priority/urgent").await.json::<Value>();
    assert_eq!(titles(&urgent), vec!["Done"]);

    let home = api.server.get("/api/todos/tag/home").await.json::<Value>();
    assert_eq!(titles(&home), vec!["Open"]);

    api.server
        .get("/api/todos/status/maybe")
        .await
        .assert_status_bad_request();
    api.server
        .get("/api/todos/priority/critical")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn overdue_and_due_soon_views() {
    let api = api();
    create(&api, json!({"title": "Late", "dueDate": "2024-12-31T12:00:00"})).await;
    create(&api, json!({"title": "Soon", "dueDate": "2025-01-03T12:00:00"})).await;
    create(&api, json!({"title": "Later", "dueDate": "2025-03-01T12:00:00"})).await;
    create(&api, json!({"title": "Whenever"})).await;

    let overdue = api.server.get("/api/todos/overdue").await.json::<Value>();
    assert_eq!(titles(&overdue), vec!["Late"]);

    let soon = api.server.get("/api/todos/due-soon").await.json::<Value>();
    assert_eq!(titles(&soon), vec!["Soon"]);

    let wide = api
        .server
        .get("/api/todos/due-soon")
        .add_query_param("days", 90)
        .await
        .json::<Value>();
    assert_eq!(titles(&wide), vec!["Later", "Soon"]);

    for days in ["0", "366", "abc"] {
        api.server
            .get("/api/todos/due-soon")
            .add_query_param("days", days)
            .await
            .assert_status_bad_request();
    }
}

#[tokio::test]
async fn stats_tally_completion_and_priority() {
    let api = api();
    let first = create(&api, json!({"title": "A", "priority": "HIGH"})).await;
    create(&api, json!({"title": "B", "priority": "URGENT"})).await;
    create(&api, json!({"title": "C"})).await;
    api.server
        .patch(&format!("/api/todos/{}/toggle", first["id"].as_str().unwrap()))
        .await
        .assert_status_ok();

    let stats = api.server.get("/api/todos/stats").await.json::<Value>();

    assert_eq!(
        stats,
        json!({
            "totalTodos": 3,
            "completedTodos": 1,
            "pendingTodos": 2,
            "highPriorityTodos": 1,
            "urgentTodos": 1
        })
    );
}

#[tokio::test]
async fn responses_carry_a_correlation_id() {
    let api = api();
    let id = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";

    let echoed = api
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-correlation-id"),
            HeaderValue::from_static(id),
        )
        .await;
    echoed.assert_status_ok();
    echoed.assert_text("ok");
    assert_eq!(echoed.header(CORRELATION_ID_HEADER), id);

    let generated = api.server.get("/api/todos").await;
    assert!(
        uuid::Uuid::parse_str(generated.header(CORRELATION_ID_HEADER).to_str().unwrap()).is_ok()
    );
}

#[tokio::test]
async fn store_outage_maps_to_500_and_not_ready() {
    let api = api();
    api.store.set_offline(true);

    let response = api.server.get("/api/todos").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "INTERNAL_SERVER_ERROR");

    api.server
        .get("/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);

    api.store.set_offline(false);
    api.server.get("/ready").await.assert_status_ok();
}
