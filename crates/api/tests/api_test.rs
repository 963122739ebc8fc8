//! Router tests for the runner HTTP API.

use std::sync::Arc;

use api::{app, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use connectors::mock::MockConnector;
use connectors::{ConnectorConfig, ConnectorRegistry};
use engine::WorkflowEngine;
use serde_json::{json, Value};
use tower::ServiceExt;

fn make_app(registry: ConnectorRegistry) -> axum::Router {
    app(AppState::new(WorkflowEngine::new(Arc::new(registry))))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn read_json(res: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn dsl(steps: Value) -> Value {
    json!({ "name": "wf", "trigger": { "type": "manual", "config": {} }, "steps": steps })
}

// ---------------------------------------------------------------------------
// Health / fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_runner() {
    let res = make_app(ConnectorRegistry::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await, json!({ "ok": true, "service": "runner" }));
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let res = make_app(ConnectorRegistry::new())
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await, json!({ "error": "NOT_FOUND" }));
}

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------

#[tokio::test]
async fn execute_returns_the_trace() {
    let body = json!({
        "runId": "r1",
        "trigger": { "phone": "0912" },
        "dslJson": dsl(json!([
            { "id": "s1", "connector": "core.case", "operation": "create",
              "input": { "type": "LEAD", "data": { "phone": "{{trigger.phone}}" } } },
            { "id": "s2", "connector": "ir.sms", "operation": "send",
              "input": { "to": "{{trigger.phone}}", "message": "case {{s1.output.id}}" } }
        ])),
    });

    let res = make_app(ConnectorRegistry::builtin(ConnectorConfig::default()))
        .oneshot(post_json("/execute", &body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let json = read_json(res).await;
    assert_eq!(json["runId"], "r1");
    assert_eq!(json["status"], "SUCCEEDED");
    assert_eq!(json["logs"][0]["stepId"], "s1");
    assert_eq!(json["logs"][0]["attempt"], 1);
    assert_eq!(json["logs"][1]["output"]["messageId"], "sms_r1:s2");
}

#[tokio::test]
async fn failed_run_is_still_ok() {
    let boom = Arc::new(MockConnector::failing("boom", "ZARINPAL_REQUEST_FAILED:-1"));
    let registry = ConnectorRegistry::new().with("mock.pay", "create", boom);
    let body = json!({
        "runId": "r2",
        "trigger": {},
        "dslJson": dsl(json!([
            { "id": "s1", "connector": "mock.pay", "operation": "create",
              "policy": { "maxAttempts": 2, "backoffMs": 0 } }
        ])),
    });

    let res = make_app(registry).oneshot(post_json("/execute", &body)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let json = read_json(res).await;
    assert_eq!(json["status"], "FAILED");
    assert_eq!(json["logs"][0]["status"], "FAILED");
    assert_eq!(json["logs"][0]["attempt"], 2);
    assert_eq!(json["logs"][0]["errorMessage"], "ZARINPAL_REQUEST_FAILED:-1");
}

#[tokio::test]
async fn invalid_definition_is_400() {
    let body = json!({ "runId": "r3", "trigger": {}, "dslJson": dsl(json!([])) });
    let res = make_app(ConnectorRegistry::new())
        .oneshot(post_json("/execute", &body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await, json!({ "error": "workflow has no steps" }));
}

#[tokio::test]
async fn unreadable_body_is_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/execute")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = make_app(ConnectorRegistry::new()).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(res).await["error"].is_string());
}
