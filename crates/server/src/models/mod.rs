//! Domain models for Cadence.
//!
//! These are validated domain objects, independent of row layouts (which live
//! in `crate::db`) and request/response payloads (which live in the routes).

pub mod chat;
pub mod contact;
pub mod document;
pub mod event;
pub mod note;
pub mod project;
pub mod role;
pub mod session;
pub mod share;
pub mod time_entry;
pub mod user;

pub use chat::ChatMessage;
pub use contact::Contact;
pub use document::Document;
pub use event::{Event, EventScope, Frequency, MonthlyPattern, RecurrenceRule};
pub use note::Note;
pub use project::{Project, TeamMember};
pub use role::{ContentAction, ContentModule, PermissionSet, Role};
pub use session::{CurrentUser, keys as session_keys};
pub use share::{ResourceShare, ResourceType};
pub use time_entry::TimeEntry;
pub use user::User;
