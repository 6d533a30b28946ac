//! Seed the database with demo data.
//!
//! Creates two demo accounts, a shared project with a teammate on the
//! Editor role, and a sampling of content: a note, a contact, a running
//! time entry, a weekly recurring event series, and a chat message.
//!
//! Demo credentials:
//!
//! - `demo@cadence.test` / `demo-password` (project owner)
//! - `taylor@cadence.test` / `demo-password` (Editor)
//!
//! The command refuses to run twice; drop and re-migrate the database to
//! start over.

use chrono::{Duration, Utc};
use uuid::Uuid;

use cadence_core::ProjectStatus;
use cadence_server::db::contacts::ContactInput;
use cadence_server::db::events::EventInput;
use cadence_server::db::notes::NoteInput;
use cadence_server::db::projects::NewProject;
use cadence_server::db::time_entries::TimeEntryInput;
use cadence_server::db::{
    ChatRepository, ContactRepository, EventRepository, MemberRepository, NoteRepository,
    ProjectRepository, RoleRepository, TimeEntryRepository,
};
use cadence_server::models::role::EDITOR_ROLE;
use cadence_server::models::{Frequency, MonthlyPattern, RecurrenceRule, User};
use cadence_server::services::auth::{AuthError, AuthService};
use cadence_server::services::recurrence;

const DEMO_PASSWORD: &str = "demo-password";

/// Seed the database with demo accounts and content.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations have not
/// been run, or the demo accounts already exist.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let auth = AuthService::new(&pool);
    let owner = register(&auth, "demo@cadence.test", "Demo User").await?;
    let teammate = register(&auth, "taylor@cadence.test", "Taylor Demo").await?;

    // Shared project with the teammate as an Editor
    let project = ProjectRepository::new(&pool)
        .create(
            owner.id,
            &owner.email,
            NewProject {
                name: "Website Relaunch",
                description: "Demo project seeded by the CLI",
                status: ProjectStatus::Active,
                start_date: None,
                end_date: None,
            },
        )
        .await?;

    let roles = RoleRepository::new(&pool).list(project.id).await?;
    let editor = roles
        .iter()
        .find(|r| r.name == EDITOR_ROLE)
        .ok_or("default Editor role missing; are migrations up to date?")?;

    MemberRepository::new(&pool)
        .add(project.id, &teammate.email, Some(teammate.id), editor.id)
        .await?;

    NoteRepository::new(&pool)
        .create(
            owner.id,
            NoteInput {
                project_id: Some(project.id),
                title: "Kickoff notes",
                content: "Agreed on a four-week timeline. Taylor owns the copy.",
                tags: &["kickoff".to_owned(), "planning".to_owned()],
            },
        )
        .await?;

    ContactRepository::new(&pool)
        .create(
            owner.id,
            ContactInput {
                project_id: None,
                name: "Jordan Vale",
                email: Some("jordan@vale.example"),
                phone: None,
                company: Some("Vale Design Co"),
                notes: "Freelance designer, referred by Taylor.",
            },
        )
        .await?;

    let now = Utc::now();
    TimeEntryRepository::new(&pool)
        .create(
            owner.id,
            TimeEntryInput {
                project_id: Some(project.id),
                description: "Information architecture review",
                started_at: now - Duration::hours(2),
                ended_at: Some(now - Duration::minutes(15)),
            },
        )
        .await?;

    // Weekly standup, Mondays and Thursdays, eight occurrences
    let rule = RecurrenceRule {
        frequency: Frequency::Weekly,
        interval: 1,
        days_of_week: Some(vec![1, 4]),
        monthly_pattern: MonthlyPattern::default(),
        end_date: None,
        count: Some(8),
    };
    let start = now.date_naive();
    let dates = recurrence::expand(start, &rule);
    let events = EventRepository::new(&pool)
        .create_series(
            owner.id,
            EventInput {
                project_id: Some(project.id),
                title: "Standup",
                description: "Fifteen minutes, camera optional.",
                date: start,
                start_time: None,
                end_time: None,
                location: Some("Video call"),
            },
            &rule,
            Uuid::new_v4(),
            &dates,
        )
        .await?;

    ChatRepository::new(&pool)
        .create(
            project.id,
            teammate.id,
            "First draft of the homepage copy is up, feedback welcome.",
        )
        .await?;

    tracing::info!(
        project_id = %project.id,
        events = events.len(),
        "Seeding complete! Log in as demo@cadence.test / {DEMO_PASSWORD}"
    );
    Ok(())
}

async fn register(
    auth: &AuthService<'_>,
    email: &str,
    name: &str,
) -> Result<User, Box<dyn std::error::Error>> {
    match auth.register(email, name, DEMO_PASSWORD).await {
        Ok(user) => Ok(user),
        Err(AuthError::UserAlreadyExists) => {
            Err(format!("demo account {email} already exists; database is already seeded").into())
        }
        Err(e) => Err(e.into()),
    }
}
