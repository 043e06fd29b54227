//! End-to-end relay tests
//!
//! Each test starts the HTTP stack on an ephemeral port over the in-memory
//! store, delivers webhooks with a real client and inspects the spy trackers.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use relay_core::entities::{IssuePatch, RepoRef};
use relay_core::value_objects::IssueState;
use relay_service::testing::{
    TrackerCall, FIRST_COMMENT_ID, FIRST_ISSUE_NUMBER, HUB_BOT, HUB_ORG, HUB_REPO,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn mirrored_server() -> TestServer {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");
    let response = server
        .source_webhook("issues", &source_issue("opened", "alice"))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
    server
}

fn hub_repo() -> RepoRef {
    RepoRef::new(HUB_ORG, HUB_REPO)
}

fn source_repo() -> RepoRef {
    RepoRef::new(SOURCE_ORG, SOURCE_REPO)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_readiness_check() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Source -> Hub Tests
// ============================================================================

#[tokio::test]
async fn test_opened_issue_is_mirrored_on_hub() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");

    let response = server
        .source_webhook("issues", &source_issue("opened", "alice"))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["outcome"], "applied");
    assert_eq!(body["direction"], "source_to_hub");
    assert!(body["intent_id"].is_string());

    let calls = server.fixture.hub.calls();
    assert_eq!(calls.len(), 1);
    let TrackerCall::CreateIssue { repo, title, body } = &calls[0] else {
        panic!("expected CreateIssue, got {calls:?}");
    };
    assert_eq!(repo, &hub_repo());
    assert_eq!(title, "acme/widgets#7: Bug");
    assert_eq!(body, "@alice posted:\n\nIt broke");
    assert_eq!(server.fixture.source.call_count(), 0);
}

#[tokio::test]
async fn test_bot_authored_issue_is_not_mirrored() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");

    let response = server
        .source_webhook("issues", &source_issue("opened", "source-sync[bot]"))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["outcome"], "ignored");
    assert_eq!(body["reason"], "synchronized_actor");
    assert_eq!(server.fixture.tracker_calls(), 0);
}

#[tokio::test]
async fn test_source_close_is_pushed_to_hub() {
    let server = mirrored_server().await;

    let response = server
        .source_webhook("issues", &source_issue("closed", "alice"))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    assert_eq!(
        server.fixture.hub.calls().last(),
        Some(&TrackerCall::EditIssue {
            repo: hub_repo(),
            number: FIRST_ISSUE_NUMBER,
            patch: IssuePatch::state(IssueState::Closed),
        })
    );
}

#[tokio::test]
async fn test_comment_round_trip_is_not_echoed() {
    let server = mirrored_server().await;
    let issue = source_issue("opened", "alice");

    let response = server
        .source_webhook("issue_comment", &comment_on(&issue, "created", 100, "dave", "me too"))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        server.fixture.hub.calls().last(),
        Some(&TrackerCall::CreateComment {
            repo: hub_repo(),
            issue_number: FIRST_ISSUE_NUMBER,
            body: "@dave posted:\n\nme too".to_string(),
        })
    );

    // The hub webhook for the comment the relay just created
    let echo = comment_on(
        &hub_issue("opened", HUB_BOT),
        "created",
        FIRST_COMMENT_ID,
        HUB_BOT,
        "@dave posted:\n\nme too",
    );
    let before = server.fixture.tracker_calls();
    let response = server
        .hub_webhook("issue_comment", &echo)
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["reason"], "synchronized_actor");
    assert_eq!(server.fixture.tracker_calls(), before);
}

// ============================================================================
// Hub -> Source Tests
// ============================================================================

#[tokio::test]
async fn test_hub_edit_is_reverted() {
    let server = mirrored_server().await;

    let response = server
        .hub_webhook("issues", &hub_title_edit("maintainer", "acme/widgets#7: Bug"))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["outcome"], "applied");

    assert_eq!(
        server.fixture.hub.calls().last(),
        Some(&TrackerCall::EditIssue {
            repo: hub_repo(),
            number: FIRST_ISSUE_NUMBER,
            patch: IssuePatch {
                title: Some("acme/widgets#7: Bug".to_string()),
                body: None,
                state: None,
            },
        })
    );
    assert_eq!(server.fixture.source.call_count(), 0);
}

#[tokio::test]
async fn test_hub_close_is_pushed_to_source() {
    let server = mirrored_server().await;

    let response = server
        .hub_webhook("issues", &hub_issue("closed", "maintainer"))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["direction"], "hub_to_source");

    assert_eq!(
        server.fixture.source.calls(),
        vec![TrackerCall::EditIssue {
            repo: source_repo(),
            number: SOURCE_ISSUE_NUMBER,
            patch: IssuePatch::state(IssueState::Closed),
        }]
    );
}

#[tokio::test]
async fn test_hub_comment_is_relayed_to_source() {
    let server = mirrored_server().await;

    let response = server
        .hub_webhook(
            "issue_comment",
            &comment_on(&hub_issue("opened", "maintainer"), "created", 300, "maintainer", "Fixed in main"),
        )
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    assert_eq!(
        server.fixture.source.calls(),
        vec![TrackerCall::CreateComment {
            repo: source_repo(),
            issue_number: SOURCE_ISSUE_NUMBER,
            body: "@maintainer posted:\n\nFixed in main".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_hub_event_from_other_repo_is_ignored() {
    let server = mirrored_server().await;
    let before = server.fixture.tracker_calls();
    let mut payload = hub_issue("closed", "maintainer");
    payload["repository"]["name"] = json!("unrelated-repo");

    let response = server
        .hub_webhook("issues", &payload)
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["outcome"], "ignored");
    assert_eq!(body["reason"], "foreign_repository");
    assert_eq!(server.fixture.tracker_calls(), before);
}

// ============================================================================
// Delivery Handling Tests
// ============================================================================

#[tokio::test]
async fn test_ping_is_acknowledged() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");

    let response = server
        .source_webhook("ping", &json!({ "zen": "Design for failure.", "hook_id": 1 }))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["outcome"], "ignored");
    assert_eq!(body["reason"], "ping");
}

#[tokio::test]
async fn test_unsupported_event_is_rejected() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");

    let response = server
        .source_webhook("issues", &source_issue("labeled", "alice"))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(body["error"]["code"], "UNSUPPORTED_EVENT");
    assert_eq!(server.fixture.tracker_calls(), 0);
}

#[tokio::test]
async fn test_event_for_unmapped_issue_fails() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");

    let response = server
        .hub_webhook("issues", &hub_issue("closed", "maintainer"))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();

    assert_eq!(body["error"]["code"], "UNKNOWN_ISSUE_MAPPING");
    assert_eq!(server.fixture.tracker_calls(), 0);
}

#[tokio::test]
async fn test_failed_relay_leaves_pending_intent() {
    let server = TestServer::start(&[SOURCE_ORG]).await.expect("Failed to start server");
    server.fixture.hub.fail_with(502);

    let response = server
        .source_webhook("issues", &source_issue("opened", "alice"))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();

    let response = server
        .get("/admin/intents/pending")
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["count"], 1);
    assert_eq!(body["intents"][0]["direction"], "source_to_hub");
    assert_eq!(body["intents"][0]["entity_id"], SOURCE_ISSUE_ID);
}
