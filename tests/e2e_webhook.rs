//! E2E tests for the provider webhook state machine

mod common;

use common::TestServer;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount the account-detail enrichment endpoint on the provider mock.
async fn mount_account_detail(provider: &MockServer, account_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/accounts/{account_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(provider)
        .await;
}

#[tokio::test]
async fn test_creation_success_updates_profile_and_enriches() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    mount_account_detail(
        &server.provider_mock,
        "A1",
        json!({
            "id": "A1",
            "connection_params": { "im": { "publicIdentifier": "pub1" } },
        }),
    )
    .await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "CREATION_SUCCESS",
            "account_id": "A1",
            "name": "U1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["accountId"], "A1");
    assert_eq!(body["userId"], "U1");

    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.linkedin_connected, Some(true));
    assert_eq!(profile.unipile_id.as_deref(), Some("A1"));
    assert_eq!(profile.linkedin_profile_id.as_deref(), Some("pub1"));
}

#[tokio::test]
async fn test_reconnected_status_is_processed() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    mount_account_detail(
        &server.provider_mock,
        "A2",
        json!({
            "id": "A2",
            "connection_params": { "im": { "publicIdentifier": "pub2" } },
        }),
    )
    .await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "RECONNECTED",
            "account_id": "A2",
            "name": "U1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.unipile_id.as_deref(), Some("A2"));
}

#[tokio::test]
async fn test_unhandled_status_is_acknowledged_without_mutation() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "CREATION_FAILED",
            "account_id": "A1",
            "name": "U1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.linkedin_connected, None);
    assert_eq!(profile.unipile_id, None);
}

#[tokio::test]
async fn test_account_status_heartbeat_is_ignored() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "AccountStatus": { "account_id": "A1", "message": "OK" },
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.linkedin_connected, None);
}

#[tokio::test]
async fn test_missing_account_id_is_400() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "CREATION_SUCCESS",
            "name": "U1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.linkedin_connected, None);
}

#[tokio::test]
async fn test_unparseable_body_is_400() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .header("content-type", "application/json")
        .body("not json at all")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_non_post_method_is_405() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(&server.url("/unipile-webhook"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_unknown_user_is_500() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "CREATION_SUCCESS",
            "account_id": "A1",
            "name": "ghost",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_enrichment_fetch_failure_is_soft() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    // No account-detail mock mounted: the enrichment call 404s.
    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "CREATION_SUCCESS",
            "account_id": "A1",
            "name": "U1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    // Primary update committed, enrichment skipped
    assert_eq!(profile.linkedin_connected, Some(true));
    assert_eq!(profile.unipile_id.as_deref(), Some("A1"));
    assert_eq!(profile.linkedin_profile_id, None);
}

#[tokio::test]
async fn test_missing_public_identifier_is_soft() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    mount_account_detail(
        &server.provider_mock,
        "A1",
        json!({ "id": "A1", "connection_params": {} }),
    )
    .await;

    let response = server
        .client
        .post(&server.url("/unipile-webhook"))
        .json(&json!({
            "status": "CREATION_SUCCESS",
            "account_id": "A1",
            "name": "U1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.linkedin_connected, Some(true));
    assert_eq!(profile.linkedin_profile_id, None);
}

#[tokio::test]
async fn test_redelivered_event_is_idempotent() {
    let server = TestServer::new().await;
    server.create_test_profile("U1").await;

    mount_account_detail(
        &server.provider_mock,
        "A1",
        json!({
            "id": "A1",
            "connection_params": { "im": { "publicIdentifier": "pub1" } },
        }),
    )
    .await;

    let event = json!({
        "status": "CREATION_SUCCESS",
        "account_id": "A1",
        "name": "U1",
    });

    for _ in 0..2 {
        let response = server
            .client
            .post(&server.url("/unipile-webhook"))
            .json(&event)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let profile = server.state.db.get_profile("U1").await.unwrap().unwrap();
    assert_eq!(profile.linkedin_connected, Some(true));
    assert_eq!(profile.unipile_id.as_deref(), Some("A1"));
    assert_eq!(profile.linkedin_profile_id.as_deref(), Some("pub1"));
}
