//! Integration tests for content visibility, sharing, and role capabilities.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p cadence-server)
//!
//! Run with: cargo test -p cadence-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use cadence_integration_tests::{TestUser, body_json};

// ============================================================================
// Ownership and isolation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_personal_content_invisible_to_others() {
    let alice = TestUser::register("Alice").await;
    let oscar = TestUser::register("Oscar").await;

    let note = body_json(
        alice
            .post(
                "/api/notes",
                &json!({"title": "Private", "content": "for my eyes"}),
            )
            .await,
    )
    .await;
    let note_id = note["id"].as_i64().expect("note id");

    // Outsiders see 404 on read, update, and delete alike
    let resp = oscar.get(&format!("/api/notes/{note_id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = oscar
        .put(
            &format!("/api/notes/{note_id}"),
            &json!({"title": "Hijacked", "content": ""}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = oscar.delete(&format!("/api/notes/{note_id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let mine = body_json(oscar.get("/api/notes").await).await;
    assert!(mine.as_array().expect("notes array").is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_project_content_visible_to_members() {
    let owner = TestUser::register("Olive").await;
    let member = TestUser::register("Milo").await;
    let project_id = owner.create_project("Shared").await;
    owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": member.email, "role": "Viewer"}),
        )
        .await;

    let doc = body_json(
        owner
            .post(
                "/api/documents",
                &json!({"title": "Plan", "content": "Q3 roadmap", "project_id": project_id}),
            )
            .await,
    )
    .await;
    let doc_id = doc["id"].as_i64().expect("document id");

    let resp = member.get(&format!("/api/documents/{doc_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Role capabilities
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_viewer_cannot_create_or_edit_project_content() {
    let owner = TestUser::register("Olive").await;
    let viewer = TestUser::register("Vera").await;
    let project_id = owner.create_project("Shared").await;
    owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": viewer.email, "role": "Viewer"}),
        )
        .await;

    // Creating project content requires the create capability
    let resp = viewer
        .post(
            "/api/contacts",
            &json!({"name": "Lead", "project_id": project_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Editing someone else's project content requires the edit capability
    let contact = body_json(
        owner
            .post(
                "/api/contacts",
                &json!({"name": "Lead", "project_id": project_id}),
            )
            .await,
    )
    .await;
    let contact_id = contact["id"].as_i64().expect("contact id");
    let resp = viewer
        .put(
            &format!("/api/contacts/{contact_id}"),
            &json!({"name": "Renamed", "project_id": project_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_editor_can_edit_but_owner_bypasses_capabilities() {
    let owner = TestUser::register("Olive").await;
    let editor = TestUser::register("Ed").await;
    let project_id = owner.create_project("Shared").await;
    owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": editor.email, "role": "Editor"}),
        )
        .await;

    let note = body_json(
        editor
            .post(
                "/api/notes",
                &json!({"title": "Draft", "content": "v1", "project_id": project_id}),
            )
            .await,
    )
    .await;
    let note_id = note["id"].as_i64().expect("note id");

    // The entity's creator can always update their own entity
    let resp = editor
        .put(
            &format!("/api/notes/{note_id}"),
            &json!({"title": "Draft", "content": "v2", "project_id": project_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_update_cannot_move_content_into_foreign_project() {
    let owner = TestUser::register("Olive").await;
    let outsider = TestUser::register("Oscar").await;
    let project_id = owner.create_project("Target").await;

    // Re-pointing a personal event at a project the caller isn't in fails
    // like the project doesn't exist, leaving the project's feed untouched.
    let event = body_json(
        outsider
            .post(
                "/api/events",
                &json!({"title": "Mine", "date": "2026-10-01"}),
            )
            .await,
    )
    .await;
    let event_id = event[0]["id"].as_i64().expect("event id");
    let resp = outsider
        .put(
            &format!("/api/events/{event_id}"),
            &json!({"title": "Planted", "date": "2026-10-01", "project_id": project_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let entry = body_json(
        outsider
            .post("/api/time-entries", &json!({"description": "Mine"}))
            .await,
    )
    .await;
    let entry_id = entry["id"].as_i64().expect("entry id");
    let resp = outsider
        .put(
            &format!("/api/time-entries/{entry_id}"),
            &json!({"description": "Planted", "project_id": project_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A member without the edit capability is refused outright
    owner
        .post(
            &format!("/api/projects/{project_id}/members"),
            &json!({"email": outsider.email, "role": "Viewer"}),
        )
        .await;
    let resp = outsider
        .put(
            &format!("/api/events/{event_id}"),
            &json!({"title": "Planted", "date": "2026-10-01", "project_id": project_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Nothing leaked into the project
    let events = body_json(owner.get("/api/events").await).await;
    assert!(
        events
            .as_array()
            .expect("events array")
            .iter()
            .all(|e| e["title"] != "Planted"),
        "foreign content must not reach the project"
    );
}

// ============================================================================
// Entity shares
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_share_grants_visibility() {
    let alice = TestUser::register("Alice").await;
    let bella = TestUser::register("Bella").await;

    let note = body_json(
        alice
            .post(
                "/api/notes",
                &json!({"title": "Recipe", "content": "secret sauce"}),
            )
            .await,
    )
    .await;
    let note_id = note["id"].as_i64().expect("note id");

    let resp = bella.get(&format!("/api/notes/{note_id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = alice
        .post(
            &format!("/api/notes/{note_id}/shares"),
            &json!({"email": bella.email}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = bella.get(&format!("/api/notes/{note_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Revoking the share hides the note again
    let shares = body_json(alice.get(&format!("/api/notes/{note_id}/shares")).await).await;
    let target_user_id = shares[0]["user_id"].as_i64().expect("share user id");
    let resp = alice
        .delete(&format!("/api/notes/{note_id}/shares/{target_user_id}"))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = bella.get(&format!("/api/notes/{note_id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_only_the_owner_manages_shares() {
    let alice = TestUser::register("Alice").await;
    let bella = TestUser::register("Bella").await;
    let carol = TestUser::register("Carol").await;

    let note = body_json(
        alice
            .post("/api/notes", &json!({"title": "Mine", "content": ""}))
            .await,
    )
    .await;
    let note_id = note["id"].as_i64().expect("note id");
    alice
        .post(
            &format!("/api/notes/{note_id}/shares"),
            &json!({"email": bella.email}),
        )
        .await;

    // Even a user who can see the note cannot manage its shares
    let resp = bella.get(&format!("/api/notes/{note_id}/shares")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = bella
        .post(
            &format!("/api/notes/{note_id}/shares"),
            &json!({"email": carol.email}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Self-shares and unknown addressees are rejected up front
    let resp = alice
        .post(
            &format!("/api/notes/{note_id}/shares"),
            &json!({"email": alice.email}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = alice
        .post(
            &format!("/api/notes/{note_id}/shares"),
            &json!({"email": "nobody@cadence.test"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Time entries
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_time_entry_stop_is_one_shot() {
    let alice = TestUser::register("Alice").await;

    let entry = body_json(
        alice
            .post("/api/time-entries", &json!({"description": "Deep work"}))
            .await,
    )
    .await;
    let entry_id = entry["id"].as_i64().expect("entry id");
    assert!(entry["ended_at"].is_null());
    assert!(entry["duration_seconds"].is_null());

    let resp = alice
        .post(&format!("/api/time-entries/{entry_id}/stop"), &json!({}))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stopped = body_json(resp).await;
    assert!(stopped["ended_at"].is_string());
    assert!(stopped["duration_seconds"].is_i64());

    // Stopping an already-stopped entry fails
    let resp = alice
        .post(&format!("/api/time-entries/{entry_id}/stop"), &json!({}))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
