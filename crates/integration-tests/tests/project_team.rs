//! Integration tests for projects, members, roles, and team chat.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p cadence-server)
//!
//! Run with: cargo test -p cadence-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use cadence_integration_tests::{TestUser, body_json};

// ============================================================================
// Members
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_owner_listed_first_with_full_permissions() {
    let owner = TestUser::register("Olive").await;
    let member = TestUser::register("Milo").await;
    let project_id = owner.create_project("Team").await;

    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": member.email, "role": "Editor"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = owner.get(&format!("/api/projects/{project_id}/members")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let members = body_json(resp).await;
    let members = members.as_array().expect("members array");

    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["email"], owner.email);
    assert_eq!(members[0]["role_name"], "Owner");
    assert_eq!(members[1]["email"], member.email);
    assert_eq!(members[1]["role_name"], "Editor");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_member_role_resolved_by_name_or_id() {
    let owner = TestUser::register("Olive").await;
    let member = TestUser::register("Milo").await;
    let project_id = owner.create_project("Team").await;

    // Add by role name (case-insensitive)
    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": member.email, "role": "viewer"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let added = body_json(resp).await;
    assert_eq!(added["role_name"], "Viewer");
    let member_id = added["id"].as_i64().expect("member id");

    // Change role by numeric ID
    let roles = body_json(owner.get(&format!("/api/projects/{project_id}/roles")).await).await;
    let editor_id = role_id(&roles, "Editor");
    let resp = owner
        .put(
            &format!("/api/projects/{project_id}/members/{member_id}"),
            &json!({"role": editor_id.to_string()}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let changed = body_json(resp).await;
    assert_eq!(changed["role_name"], "Editor");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_role_rejected() {
    let owner = TestUser::register("Olive").await;
    let project_id = owner.create_project("Team").await;

    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": "someone@cadence.test", "role": "Archduke"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_owner_membership_cannot_be_changed() {
    let owner = TestUser::register("Olive").await;
    let project_id = owner.create_project("Team").await;

    let members = body_json(owner.get(&format!("/api/projects/{project_id}/members")).await).await;
    let owner_member_id = members[0]["id"].as_i64().expect("member id");

    let resp = owner
        .put(
            &format!("/api/projects/{project_id}/members/{owner_member_id}"),
            &json!({"role": "Viewer"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = owner
        .delete(&format!("/api/projects/{project_id}/members/{owner_member_id}"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invited_email_claims_membership_on_registration() {
    let owner = TestUser::register("Olive").await;
    let project_id = owner.create_project("Team").await;

    // Invite an address that has no account yet
    let email = format!("invitee-{}@cadence.test", uuid::Uuid::new_v4());
    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": email, "role": "Editor"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invited = body_json(resp).await;
    assert_eq!(invited["is_registered"], false);

    // Registering under that email links the membership
    let invitee = TestUser::register_with_email("Ivy", &email).await;
    let projects = body_json(invitee.get("/api/projects").await).await;
    let ids: Vec<i64> = projects
        .as_array()
        .expect("projects array")
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert!(ids.contains(&project_id));
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_default_roles_are_immutable() {
    let owner = TestUser::register("Olive").await;
    let project_id = owner.create_project("Team").await;

    let roles = body_json(owner.get(&format!("/api/projects/{project_id}/roles")).await).await;
    let viewer_id = role_id(&roles, "Viewer");

    let resp = owner
        .put(
            &format!("/api/projects/{project_id}/roles/{viewer_id}"),
            &json!({"name": "Watcher"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = owner
        .delete(&format!("/api/projects/{project_id}/roles/{viewer_id}"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_custom_role_lifecycle() {
    let owner = TestUser::register("Olive").await;
    let member = TestUser::register("Milo").await;
    let project_id = owner.create_project("Team").await;

    // Create a custom role with a narrow capability set
    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/roles"),
            &json!({
                "name": "Note Taker",
                "description": "Notes only",
                "permissions": {"view_notes": true, "create_notes": true, "edit_notes": true}
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let role = body_json(resp).await;
    let role_id = role["id"].as_i64().expect("role id");
    assert_eq!(role["is_default"], false);
    assert_eq!(role["permissions"]["create_notes"], true);
    assert_eq!(role["permissions"]["delete_notes"], false);

    // Assign it; deletion is now blocked
    owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": member.email, "role": "Note Taker"}),
        )
        .await;
    let resp = owner
        .delete(&format!("/api/projects/{project_id}/roles/{role_id}"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unassign (remove the member) and deletion succeeds
    let members = body_json(owner.get(&format!("/api/projects/{project_id}/members")).await).await;
    let member_row = members
        .as_array()
        .expect("members array")
        .iter()
        .find(|m| m["email"] == member.email)
        .expect("member row")
        .clone();
    let member_id = member_row["id"].as_i64().expect("member id");
    owner
        .delete(&format!("/api/projects/{project_id}/members/{member_id}"))
        .await;

    let resp = owner
        .delete(&format!("/api/projects/{project_id}/roles/{role_id}"))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_chat_polling_with_since_cursor() {
    let owner = TestUser::register("Olive").await;
    let member = TestUser::register("Milo").await;
    let project_id = owner.create_project("Team").await;
    owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": member.email, "role": "Viewer"}),
        )
        .await;

    let first = body_json(
        owner
            .post(
                &format!("/api/projects/{project_id}/messages"),
                &json!({"body": "hello"}),
            )
            .await,
    )
    .await;
    let first_id = first["id"].as_i64().expect("message id");

    member
        .post(
            &format!("/api/projects/{project_id}/messages"),
            &json!({"body": "hi back"}),
        )
        .await;

    // Polling after the first message returns only the second
    let resp = owner
        .get(&format!(
            "/api/projects/{project_id}/messages?since={first_id}"
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let newer = body_json(resp).await;
    let newer = newer.as_array().expect("messages array");
    assert_eq!(newer.len(), 1);
    assert_eq!(newer[0]["body"], "hi back");
    assert_eq!(newer[0]["author_name"], "Milo");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_chat_rejects_oversized_message_without_persisting() {
    let owner = TestUser::register("Olive").await;
    let project_id = owner.create_project("Team").await;

    let oversized = "x".repeat(1001);
    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/messages"),
            &json!({"body": oversized}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Exactly at the limit is fine
    let at_limit = "x".repeat(1000);
    let resp = owner
        .post(
            &format!("/api/projects/{project_id}/messages"),
            &json!({"body": at_limit}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let messages = body_json(
        owner
            .get(&format!("/api/projects/{project_id}/messages"))
            .await,
    )
    .await;
    assert_eq!(messages.as_array().expect("messages array").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_chat_hidden_from_non_members() {
    let owner = TestUser::register("Olive").await;
    let outsider = TestUser::register("Oscar").await;
    let project_id = owner.create_project("Team").await;

    let resp = outsider
        .get(&format!("/api/projects/{project_id}/messages"))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = outsider
        .post(
            &format!("/api/projects/{project_id}/messages"),
            &json!({"body": "let me in"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Helpers
// ============================================================================

fn role_id(roles: &Value, name: &str) -> i64 {
    roles
        .as_array()
        .expect("roles array")
        .iter()
        .find(|r| r["name"] == name)
        .and_then(|r| r["id"].as_i64())
        .unwrap_or_else(|| panic!("role {name} not found"))
}
