// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use actix_web::{body::to_bytes, http::StatusCode, test, web::Bytes, App};
use fake::{faker::name::raw::*, locales::EN, Fake};
use serde_json::{json, Value};
use tracing_actix_web::TracingLogger;

use crate::providers::{Broadcaster, Database};
use crate::startup::ActixApp;
use crate::tests::{test_config, test_database};

const MESSAGES_PATH: &str = "/api/messages";

trait BodyTest {
    fn as_str(&self) -> &str;
    fn as_json(&self) -> Value;
}

impl BodyTest for Bytes {
    fn as_str(&self) -> &str {
        std::str::from_utf8(self).unwrap()
    }

    fn as_json(&self) -> Value {
        serde_json::from_slice(self).unwrap()
    }
}

async fn create_base_config() -> (Database, Broadcaster) {
    let config = test_config(None);
    let db = test_database(&config).await;
    (db, Broadcaster::new())
}

macro_rules! init_app {
    ($db:expr, $broadcaster:expr) => {
        test::init_service(
            App::new()
                .wrap(TracingLogger::default())
                .configure(ActixApp::build_app_config(
                    &test_config(None),
                    &$db,
                    &$broadcaster,
                )),
        )
        .await
    };
}

fn username() -> String {
    let name: String = FirstName(EN).fake();
    name.chars().take(20).collect()
}

#[actix_web::test]
async fn test_health_check() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::get()
        .uri("/api/health-check")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_list_messages_empty() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::get().uri(MESSAGES_PATH).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(body, json!({ "success": true, "data": [] }));
}

#[actix_web::test]
async fn test_create_message() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": "alice", "content": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["username"], json!("alice"));
    assert_eq!(body["data"]["content"], json!("hi"));
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"]["updated_at"].is_string());

    let req = test::TestRequest::get().uri(MESSAGES_PATH).to_request();
    let resp = test::call_service(&app, req).await;
    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    let messages = body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["username"], json!("alice"));
    assert_eq!(messages[0]["content"], json!("hi"));
}

#[actix_web::test]
async fn test_create_message_trims_input() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": "  bob ", "content": " hello there\n" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(body["data"]["username"], json!("bob"));
    assert_eq!(body["data"]["content"], json!("hello there"));
}

#[actix_web::test]
async fn test_create_message_empty_username() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": "", "content": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(
        body,
        json!({
            "success": false,
            "errors": { "username": "The username field is required." },
        })
    );
}

#[actix_web::test]
async fn test_create_message_too_long() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": "a".repeat(21), "content": "b".repeat(121) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(
        body["errors"]["username"],
        json!("The username field must not be greater than 20 characters.")
    );
    assert_eq!(
        body["errors"]["content"],
        json!("The content field must not be greater than 120 characters.")
    );
}

#[actix_web::test]
async fn test_create_message_length_bounds() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    for (username, content) in [
        ("a".repeat(20), "b".repeat(120)),
        ("é".repeat(20), "ü".repeat(120)),
        ("x".to_string(), "y".to_string()),
    ] {
        let req = test::TestRequest::post()
            .uri(MESSAGES_PATH)
            .set_json(json!({ "username": username, "content": content }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = to_bytes(resp.into_body()).await.unwrap().as_json();
        assert_eq!(body["data"]["username"], json!(username));
        assert_eq!(body["data"]["content"], json!(content));
    }
}

#[actix_web::test]
async fn test_create_message_missing_and_non_string_fields() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(
        body["errors"],
        json!({
            "content": "The content field is required.",
            "username": "The username field is required.",
        })
    );

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": 42, "content": ["hi"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(
        body["errors"],
        json!({
            "content": "The content field must be a string.",
            "username": "The username field must be a string.",
        })
    );
}

#[actix_web::test]
async fn test_create_message_malformed_body() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(resp.into_body()).await.unwrap();
    assert!(body.as_str().contains("\"success\":false"));
    assert!(body.as_json()["message"].is_string());
}

#[actix_web::test]
async fn test_failed_create_leaves_list_unchanged() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": username(), "content": "first" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": username(), "content": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri(MESSAGES_PATH).to_request();
    let resp = test::call_service(&app, req).await;
    let body = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_list_messages_oldest_first() {
    let (db, broadcaster) = create_base_config().await;
    let app = init_app!(db, broadcaster);

    let contents = ["one", "two", "three"];
    for content in contents {
        let req = test::TestRequest::post()
            .uri(MESSAGES_PATH)
            .set_json(json!({ "username": username(), "content": content }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri(MESSAGES_PATH).to_request();
    let resp = test::call_service(&app, req).await;
    let first = to_bytes(resp.into_body()).await.unwrap().as_json();
    let listed = first["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|message| message["content"].as_str().unwrap().to_string())
        .collect::<Vec<String>>();
    assert_eq!(listed, contents);

    let req = test::TestRequest::get().uri(MESSAGES_PATH).to_request();
    let resp = test::call_service(&app, req).await;
    let second = to_bytes(resp.into_body()).await.unwrap().as_json();
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_create_message_is_broadcast() {
    let (db, broadcaster) = create_base_config().await;
    let mut receiver = broadcaster.subscribe();
    let app = init_app!(db, broadcaster);
    let name = username();

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": name, "content": "pushed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let message = receiver.recv().await.unwrap();
    assert_eq!(message.username, name);
    assert_eq!(message.content, "pushed");

    let req = test::TestRequest::post()
        .uri(MESSAGES_PATH)
        .set_json(json!({ "username": "", "content": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(receiver.try_recv().is_err());
}
