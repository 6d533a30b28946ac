//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/auth/register              - Create an account and log in
//! POST /api/auth/login                 - Log in
//! POST /api/auth/logout                - Log out
//! GET  /api/auth/me                    - Current account
//!
//! # Projects
//! GET|POST   /api/projects
//! GET|PUT|DELETE /api/projects/{id}
//! GET|POST   /api/projects/{id}/members
//! PUT|DELETE /api/projects/{id}/members/{member_id}
//! GET|POST   /api/projects/{id}/roles
//! PUT|DELETE /api/projects/{id}/roles/{role_id}
//! GET|POST   /api/projects/{id}/messages   (?since= polling cursor)
//!
//! # Content (list endpoints scoped by the access predicate)
//! GET|POST   /api/notes            GET|PUT|DELETE /api/notes/{id}
//! GET|POST   /api/documents        GET|PUT|DELETE /api/documents/{id}
//! GET|POST   /api/contacts         GET|PUT|DELETE /api/contacts/{id}
//! GET|POST   /api/events           GET|PUT|DELETE /api/events/{id}  (?scope=)
//! GET|POST   /api/time-entries     GET|PUT|DELETE /api/time-entries/{id}
//! POST       /api/time-entries/{id}/stop
//!
//! # Shares (owner only)
//! GET|POST   /api/{resource}/{id}/shares
//! DELETE     /api/{resource}/{id}/shares/{user_id}
//! ```

pub mod auth;
pub mod chat;
pub mod contacts;
pub mod documents;
pub mod events;
pub mod members;
pub mod notes;
pub mod projects;
pub mod roles;
pub mod shares;
pub mod time_entries;

use axum::{
    Router,
    routing::{get, post, put},
};

use cadence_core::ProjectId;

use crate::db::ProjectRepository;
use crate::error::{AppError, Result};
use crate::models::{ContentAction, ContentModule, CurrentUser, PermissionSet};
use crate::state::AppState;

/// Build the full API router.
///
/// Content collections are registered with full paths rather than `nest` so
/// the shared `/api/{resource}/{id}/shares` routes can match them; a nested
/// router would swallow everything under its prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/projects", project_routes())
        .merge(note_routes())
        .merge(document_routes())
        .merge(contact_routes())
        .merge(event_routes())
        .merge(time_entry_routes())
        .merge(share_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/members", get(members::list).post(members::add))
        .route(
            "/{id}/members/{member_id}",
            put(members::change_role).delete(members::remove),
        )
        .route("/{id}/roles", get(roles::list).post(roles::create))
        .route(
            "/{id}/roles/{role_id}",
            put(roles::update).delete(roles::delete),
        )
        .route("/{id}/messages", get(chat::list).post(chat::post))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(events::list).post(events::create))
        .route(
            "/api/events/{id}",
            get(events::get).put(events::update).delete(events::delete),
        )
}

fn time_entry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/time-entries",
            get(time_entries::list).post(time_entries::create),
        )
        .route(
            "/api/time-entries/{id}",
            get(time_entries::get)
                .put(time_entries::update)
                .delete(time_entries::delete),
        )
        .route("/api/time-entries/{id}/stop", post(time_entries::stop))
}

fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/{resource}/{id}/shares",
            get(shares::list).post(shares::add),
        )
        .route(
            "/api/{resource}/{id}/shares/{user_id}",
            axum::routing::delete(shares::remove),
        )
}

fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(notes::list).post(notes::create))
        .route(
            "/api/notes/{id}",
            get(notes::get).put(notes::update).delete(notes::delete),
        )
}

fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/documents",
            get(documents::list).post(documents::create),
        )
        .route(
            "/api/documents/{id}",
            get(documents::get)
                .put(documents::update)
                .delete(documents::delete),
        )
}

fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/api/contacts/{id}",
            get(contacts::get)
                .put(contacts::update)
                .delete(contacts::delete),
        )
}

/// Resolve the caller's permissions within a project.
///
/// Outsiders and nonexistent projects both come back as 404 so a caller
/// can't distinguish them.
pub(crate) async fn member_permissions(
    state: &AppState,
    user: &CurrentUser,
    project_id: ProjectId,
) -> Result<PermissionSet> {
    ProjectRepository::new(state.pool())
        .access(project_id, user.id, &user.email)
        .await?
        .permissions()
        .ok_or_else(|| AppError::NotFound("project not found".to_owned()))
}

/// Require a per-module capability when content targets a project.
///
/// Personal content (no project) needs no capability. Project members
/// without the capability get 403; outsiders get 404 via
/// [`member_permissions`].
pub(crate) async fn ensure_content_capability(
    state: &AppState,
    user: &CurrentUser,
    project_id: Option<ProjectId>,
    module: ContentModule,
    action: ContentAction,
) -> Result<()> {
    let Some(project_id) = project_id else {
        return Ok(());
    };

    let perms = member_permissions(state, user, project_id).await?;
    if !perms.allows(module, action) {
        return Err(AppError::Forbidden(
            "you do not have permission for this action".to_owned(),
        ));
    }

    Ok(())
}
