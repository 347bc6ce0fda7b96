//! End-to-end tests for the send and verify endpoints over the in-memory store

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use pv_api::dto::SendCodeResponse;
use pv_api::{create_app, AppState};
use pv_core::domain::entities::VerificationRecord;
use pv_core::services::{VerificationService, VerificationServiceConfig, VerificationStore};
use pv_infra::MemoryVerificationStore;
use pv_shared::CorsConfig;

fn app_state(
    store: Arc<MemoryVerificationStore>,
    config: VerificationServiceConfig,
) -> web::Data<AppState> {
    let store: Arc<dyn VerificationStore> = store;
    web::Data::new(AppState::new(Arc::new(VerificationService::new(
        store, config,
    ))))
}

fn default_state() -> web::Data<AppState> {
    app_state(
        Arc::new(MemoryVerificationStore::new()),
        VerificationServiceConfig::default(),
    )
}

fn verify_request(request_id: &str, code: u32) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/verify/")
        .set_json(json!({ "requestId": request_id, "code": code }))
}

#[actix_rt::test]
async fn test_send_returns_request_id_and_code() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/send")
        .set_json(json!({ "number": "+15550001111" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let request_id = body["requestId"].as_str().unwrap();
    assert_eq!(request_id.len(), 36);
    let code = body["code"].as_u64().unwrap();
    assert!((1000..10000).contains(&code));
    assert!(body.get("number").is_none());
}

#[actix_rt::test]
async fn test_send_accepts_missing_number() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/send")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_malformed_body_is_bad_request() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/send")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_rt::test]
async fn test_verify_body_with_wrong_types_is_bad_request() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/verify/")
        .set_json(json!({ "requestId": "abc", "code": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_send_then_verify_until_locked() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/send")
        .set_json(json!({ "number": "+15550001111" }))
        .to_request();
    let sent: SendCodeResponse = test::call_and_read_body_json(&app, req).await;

    // A wrong code does not use up an attempt
    let req = verify_request(&sent.request_id, sent.code + 1).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CODE_MISMATCH");

    for _ in 0..3 {
        let before = Utc::now().timestamp();
        let req = verify_request(&sent.request_id, sent.code).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let verified_at: i64 = test::read_body_json(resp).await;
        assert!(verified_at >= before && verified_at <= Utc::now().timestamp());
    }

    let req = verify_request(&sent.request_id, sent.code).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ATTEMPTS_EXCEEDED");
}

#[actix_rt::test]
async fn test_verify_without_trailing_slash() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/send")
        .set_json(json!({ "number": "+15550001111" }))
        .to_request();
    let sent: SendCodeResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/verify")
        .set_json(json!({ "requestId": sent.request_id, "code": sent.code }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_verify_unknown_request_id_is_mismatch() {
    let app = test::init_service(create_app(default_state(), &CorsConfig::default())).await;

    let req = verify_request("00000000-0000-0000-0000-000000000000", 1234).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_verify_expired_code() {
    let store = Arc::new(MemoryVerificationStore::new());
    let config = VerificationServiceConfig {
        ttl_support: true,
        duration_seconds: 60,
        ..Default::default()
    };
    let record = VerificationRecord::new(
        "abcdefgh-ijkl-mnop-qrst-uvwxyz012345".to_string(),
        4821,
        "+15550001111".to_string(),
        Utc::now() - Duration::seconds(120),
    );
    store
        .set(&record.request_id, &record.to_bytes().unwrap(), 0)
        .await
        .unwrap();
    let app = test::init_service(create_app(
        app_state(store, config),
        &CorsConfig::default(),
    ))
    .await;

    let req = verify_request(&record.request_id, record.code).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VERIFICATION_CODE_EXPIRED");
}

#[actix_rt::test]
async fn test_verify_corrupt_record_is_server_error() {
    let store = Arc::new(MemoryVerificationStore::new());
    store.set("broken", b"not a record", 0).await.unwrap();
    let app = test::init_service(create_app(
        app_state(store, VerificationServiceConfig::default()),
        &CorsConfig::default(),
    ))
    .await;

    let req = verify_request("broken", 1234).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
