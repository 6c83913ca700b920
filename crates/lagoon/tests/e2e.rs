// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the Lagoon gateway.
//!
//! Each test creates an isolated TestHarness with temp SQLite and mock
//! provider/blob adapters. Tests are independent and order-insensitive.

use axum::http::StatusCode;
use lagoon_quota::gate::RATE_LIMIT_MESSAGE;
use lagoon_test_utils::{ImageOutcome, TestHarness};
use serde_json::json;

// ---- Scenario: guest at 9 of 10 ----

#[tokio::test]
async fn guest_under_quota_is_pinned_and_counted() {
    let harness = TestHarness::builder()
        .with_guest_policy("hidream", Some("Photographic"))
        .build()
        .await
        .unwrap();
    let guest = harness.sign_in("guest").await.unwrap();
    harness.set_usage(&guest.identity.user_id, 9).await.unwrap();

    let resp = harness
        .post_json(
            "/api/image/generate",
            Some(&guest.cookie),
            json!({"prompt": "a cat", "model": "flux-dev", "style_preset": "Anime"}),
        )
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::OK);
    let url = resp.body["url"].as_str().unwrap();
    assert!(url.starts_with("https://blob.test/generated-image-"));
    assert!(url.ends_with(".png"));

    let requests = harness.provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "hidream");
    assert_eq!(requests[0].style_preset.as_deref(), Some("Photographic"));
    assert_eq!(requests[0].prompt, "a cat");

    let stored = harness.blob.stored().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content_type, "image/png");

    assert_eq!(harness.usage(&guest.identity.user_id).await.unwrap(), 10);

    // The 11th attempt is denied.
    let resp = harness
        .post_json("/api/image/generate", Some(&guest.cookie), json!({"prompt": "a dog"}))
        .await
        .unwrap();
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
}

// ---- Scenario: regular at 50 of 50 ----

#[tokio::test]
async fn regular_at_limit_is_denied_before_provider_call() {
    let harness = TestHarness::builder().build().await.unwrap();
    let user = harness.sign_in("regular").await.unwrap();
    harness.set_usage(&user.identity.user_id, 50).await.unwrap();

    let resp = harness
        .post_json("/api/image/generate", Some(&user.cookie), json!({"prompt": "a cat"}))
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.body["code"], "rate_limit:chat");
    assert_eq!(resp.body["message"], RATE_LIMIT_MESSAGE);
    assert!(harness.provider.requests().await.is_empty());
    assert_eq!(harness.usage(&user.identity.user_id).await.unwrap(), 50);
}

#[tokio::test]
async fn unknown_user_class_is_denied() {
    let harness = TestHarness::builder().build().await.unwrap();
    let user = harness.sign_in("staff").await.unwrap();

    let resp = harness
        .post_json("/api/image/generate", Some(&user.cookie), json!({"prompt": "a cat"}))
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(harness.provider.requests().await.is_empty());

    let usage = harness.get("/api/usage", Some(&user.cookie)).await.unwrap();
    assert_eq!(usage.body["maxMessagesPerDay"], 0);
    assert_eq!(usage.body["availableChatModelIds"], json!([]));
}

#[tokio::test]
async fn concurrent_generations_publish_distinct_urls() {
    let harness = TestHarness::builder().build().await.unwrap();
    let alice = harness.sign_in("premium").await.unwrap();
    let bob = harness.sign_in("premium").await.unwrap();

    let (a, b) = tokio::join!(
        harness.post_json("/api/image/generate", Some(&alice.cookie), json!({"prompt": "a cat"})),
        harness.post_json("/api/image/generate", Some(&bob.cookie), json!({"prompt": "a dog"})),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.status, StatusCode::OK);
    assert_eq!(b.status, StatusCode::OK);
    assert_ne!(a.body["url"], b.body["url"]);
    assert_eq!(harness.blob.stored().await.len(), 2);
}

// ---- Provider and blob failures ----

#[tokio::test]
async fn provider_rejection_surfaces_detail_without_consuming_quota() {
    let harness = TestHarness::builder()
        .with_outcomes(vec![ImageOutcome::Rejected("Prompt is too long".into())])
        .build()
        .await
        .unwrap();
    let user = harness.sign_in("premium").await.unwrap();

    let resp = harness
        .post_json("/api/image/generate", Some(&user.cookie), json!({"prompt": "a cat"}))
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "bad_request:api");
    assert_eq!(resp.body["message"], "Venice API error: Prompt is too long");
    assert_eq!(harness.usage(&user.identity.user_id).await.unwrap(), 0);
    assert!(harness.blob.stored().await.is_empty());
}

#[tokio::test]
async fn provider_outage_is_offline_and_free() {
    let harness = TestHarness::builder()
        .with_outcomes(vec![ImageOutcome::Unreachable("connection reset".into())])
        .build()
        .await
        .unwrap();
    let user = harness.sign_in("regular").await.unwrap();

    let resp = harness
        .post_json("/api/image/generate", Some(&user.cookie), json!({"prompt": "a cat"}))
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.body["code"], "offline:chat");
    assert_eq!(resp.body["message"], "Failed to generate image.");
    assert_eq!(harness.usage(&user.identity.user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn blob_failure_is_offline_and_free() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.blob.set_failing(true);
    let user = harness.sign_in("regular").await.unwrap();

    let resp = harness
        .post_json("/api/image/generate", Some(&user.cookie), json!({"prompt": "a cat"}))
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(harness.provider.requests().await.len(), 1);
    assert_eq!(harness.usage(&user.identity.user_id).await.unwrap(), 0);
}

// ---- Input validation and auth ----

#[tokio::test]
async fn empty_prompt_is_bad_request() {
    let harness = TestHarness::builder().build().await.unwrap();
    let user = harness.sign_in("regular").await.unwrap();

    for body in [json!({}), json!({"prompt": ""})] {
        let resp = harness
            .post_json("/api/image/generate", Some(&user.cookie), body)
            .await
            .unwrap();
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["message"], "Prompt is required.");
    }
    assert!(harness.provider.requests().await.is_empty());
}

#[tokio::test]
async fn generate_requires_session() {
    let harness = TestHarness::builder().build().await.unwrap();

    let resp = harness
        .post_json("/api/image/generate", None, json!({"prompt": "a cat"}))
        .await
        .unwrap();
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["code"], "unauthorized:chat");

    let resp = harness
        .post_json(
            "/api/image/generate",
            Some("lagoon_session=not-a-real-token"),
            json!({"prompt": "a cat"}),
        )
        .await
        .unwrap();
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(harness.provider.requests().await.is_empty());
}

#[tokio::test]
async fn guest_sign_in_sets_cookie_that_authenticates() {
    let harness = TestHarness::builder().build().await.unwrap();

    let resp = harness.post_json("/api/auth/guest", None, json!({})).await.unwrap();
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["userType"], "guest");

    let set_cookie = resp
        .headers
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let usage = harness.get("/api/usage", Some(&cookie)).await.unwrap();
    assert_eq!(usage.status, StatusCode::OK);
    assert_eq!(usage.body["userType"], "guest");
    assert_eq!(usage.body["count"], 0);
    assert_eq!(usage.body["maxMessagesPerDay"], 10);
    assert_eq!(usage.body["remaining"], 10);
    assert_eq!(usage.body["availableChatModelIds"].as_array().unwrap().len(), 6);

    // Signing in again with a live cookie returns the same user.
    let again = harness.post_json("/api/auth/guest", Some(&cookie), json!({})).await.unwrap();
    assert_eq!(again.body["userId"], resp.body["userId"]);
    assert!(again.headers.get("set-cookie").is_none());
}

// ---- Catalogs ----

#[tokio::test]
async fn catalogs_are_public() {
    let harness = TestHarness::builder().build().await.unwrap();

    let chat = harness.get("/api/chat/models", None).await.unwrap();
    assert_eq!(chat.status, StatusCode::OK);
    assert_eq!(chat.body[0]["id"], "chat-model");

    let traits = harness.get("/api/chat/traits", None).await.unwrap();
    assert_eq!(traits.body["default"], "llama-3.3-70b");

    let models = harness.get("/api/image/models", None).await.unwrap();
    assert_eq!(models.status, StatusCode::OK);
    assert_eq!(models.body[0]["description"], "");

    let styles = harness.get("/api/image/styles", None).await.unwrap();
    assert_eq!(styles.body, json!(["Photographic", "Anime"]));
}

#[tokio::test]
async fn catalog_failure_is_500_with_error_body() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.provider.set_catalog_down(true);

    let models = harness.get("/api/image/models", None).await.unwrap();
    assert_eq!(models.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        models.body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to fetch Venice models")
    );

    let styles = harness.get("/api/image/styles", None).await.unwrap();
    assert_eq!(styles.status, StatusCode::INTERNAL_SERVER_ERROR);

    // The chat list never fails.
    let chat = harness.get("/api/chat/models", None).await.unwrap();
    assert_eq!(chat.status, StatusCode::OK);
}
