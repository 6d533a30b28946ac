//! Roles and the capability map they grant.
//!
//! Every project carries three seeded default roles (Owner, Editor, Viewer)
//! plus any custom roles its members define. A role is a fixed-shape map of
//! boolean capabilities: project administration, generic content access, and
//! per-module CRUD for documents, notes, contacts, events, and time entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::{ProjectId, RoleId};

/// Name of the seeded Owner role.
pub const OWNER_ROLE: &str = "Owner";
/// Name of the seeded Editor role.
pub const EDITOR_ROLE: &str = "Editor";
/// Name of the seeded Viewer role.
pub const VIEWER_ROLE: &str = "Viewer";

/// Content modules governed by per-module capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentModule {
    Documents,
    Notes,
    Contacts,
    Events,
    TimeEntries,
}

/// CRUD actions on a content module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentAction {
    View,
    Create,
    Edit,
    Delete,
}

/// The fixed-shape capability map a role grants.
///
/// Stored as JSONB; every field defaults to `false` so older rows missing a
/// capability deserialize safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PermissionSet {
    // Project administration
    pub manage_project: bool,
    pub manage_members: bool,
    pub manage_roles: bool,
    pub delete_project: bool,

    // Generic content access
    pub view_content: bool,
    pub create_content: bool,
    pub edit_content: bool,
    pub delete_content: bool,

    // Documents
    pub view_documents: bool,
    pub create_documents: bool,
    pub edit_documents: bool,
    pub delete_documents: bool,

    // Notes
    pub view_notes: bool,
    pub create_notes: bool,
    pub edit_notes: bool,
    pub delete_notes: bool,

    // Contacts
    pub view_contacts: bool,
    pub create_contacts: bool,
    pub edit_contacts: bool,
    pub delete_contacts: bool,

    // Events
    pub view_events: bool,
    pub create_events: bool,
    pub edit_events: bool,
    pub delete_events: bool,

    // Time entries
    pub view_time_entries: bool,
    pub create_time_entries: bool,
    pub edit_time_entries: bool,
    pub delete_time_entries: bool,
}

impl PermissionSet {
    /// Full permissions, granted by the Owner role.
    #[must_use]
    pub const fn owner() -> Self {
        Self {
            manage_project: true,
            manage_members: true,
            manage_roles: true,
            delete_project: true,
            view_content: true,
            create_content: true,
            edit_content: true,
            delete_content: true,
            view_documents: true,
            create_documents: true,
            edit_documents: true,
            delete_documents: true,
            view_notes: true,
            create_notes: true,
            edit_notes: true,
            delete_notes: true,
            view_contacts: true,
            create_contacts: true,
            edit_contacts: true,
            delete_contacts: true,
            view_events: true,
            create_events: true,
            edit_events: true,
            delete_events: true,
            view_time_entries: true,
            create_time_entries: true,
            edit_time_entries: true,
            delete_time_entries: true,
        }
    }

    /// Full content access without project administration (Editor role).
    #[must_use]
    pub const fn editor() -> Self {
        Self {
            manage_project: false,
            manage_members: false,
            manage_roles: false,
            delete_project: false,
            ..Self::owner()
        }
    }

    /// Read-only access (Viewer role).
    #[must_use]
    pub const fn viewer() -> Self {
        Self {
            view_content: true,
            view_documents: true,
            view_notes: true,
            view_contacts: true,
            view_events: true,
            view_time_entries: true,
            ..Self::default_const()
        }
    }

    const fn default_const() -> Self {
        Self {
            manage_project: false,
            manage_members: false,
            manage_roles: false,
            delete_project: false,
            view_content: false,
            create_content: false,
            edit_content: false,
            delete_content: false,
            view_documents: false,
            create_documents: false,
            edit_documents: false,
            delete_documents: false,
            view_notes: false,
            create_notes: false,
            edit_notes: false,
            delete_notes: false,
            view_contacts: false,
            create_contacts: false,
            edit_contacts: false,
            delete_contacts: false,
            view_events: false,
            create_events: false,
            edit_events: false,
            delete_events: false,
            view_time_entries: false,
            create_time_entries: false,
            edit_time_entries: false,
            delete_time_entries: false,
        }
    }

    /// Whether this set allows `action` on `module`.
    #[must_use]
    pub const fn allows(&self, module: ContentModule, action: ContentAction) -> bool {
        match (module, action) {
            (ContentModule::Documents, ContentAction::View) => self.view_documents,
            (ContentModule::Documents, ContentAction::Create) => self.create_documents,
            (ContentModule::Documents, ContentAction::Edit) => self.edit_documents,
            (ContentModule::Documents, ContentAction::Delete) => self.delete_documents,
            (ContentModule::Notes, ContentAction::View) => self.view_notes,
            (ContentModule::Notes, ContentAction::Create) => self.create_notes,
            (ContentModule::Notes, ContentAction::Edit) => self.edit_notes,
            (ContentModule::Notes, ContentAction::Delete) => self.delete_notes,
            (ContentModule::Contacts, ContentAction::View) => self.view_contacts,
            (ContentModule::Contacts, ContentAction::Create) => self.create_contacts,
            (ContentModule::Contacts, ContentAction::Edit) => self.edit_contacts,
            (ContentModule::Contacts, ContentAction::Delete) => self.delete_contacts,
            (ContentModule::Events, ContentAction::View) => self.view_events,
            (ContentModule::Events, ContentAction::Create) => self.create_events,
            (ContentModule::Events, ContentAction::Edit) => self.edit_events,
            (ContentModule::Events, ContentAction::Delete) => self.delete_events,
            (ContentModule::TimeEntries, ContentAction::View) => self.view_time_entries,
            (ContentModule::TimeEntries, ContentAction::Create) => self.create_time_entries,
            (ContentModule::TimeEntries, ContentAction::Edit) => self.edit_time_entries,
            (ContentModule::TimeEntries, ContentAction::Delete) => self.delete_time_entries,
        }
    }
}

/// A role within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role ID.
    pub id: RoleId,
    /// Project this role belongs to.
    pub project_id: ProjectId,
    /// Role name, unique within the project (case-insensitive).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Capabilities granted by this role.
    pub permissions: PermissionSet,
    /// Whether this is a seeded default role (non-editable, non-deletable).
    pub is_default: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_everything() {
        let p = PermissionSet::owner();
        assert!(p.manage_project && p.manage_members && p.manage_roles && p.delete_project);
        for module in [
            ContentModule::Documents,
            ContentModule::Notes,
            ContentModule::Contacts,
            ContentModule::Events,
            ContentModule::TimeEntries,
        ] {
            for action in [
                ContentAction::View,
                ContentAction::Create,
                ContentAction::Edit,
                ContentAction::Delete,
            ] {
                assert!(p.allows(module, action));
            }
        }
    }

    #[test]
    fn test_editor_cannot_administer() {
        let p = PermissionSet::editor();
        assert!(!p.manage_project);
        assert!(!p.manage_members);
        assert!(!p.manage_roles);
        assert!(!p.delete_project);
        assert!(p.allows(ContentModule::Notes, ContentAction::Delete));
        assert!(p.allows(ContentModule::Events, ContentAction::Create));
    }

    #[test]
    fn test_viewer_is_read_only() {
        let p = PermissionSet::viewer();
        for module in [
            ContentModule::Documents,
            ContentModule::Notes,
            ContentModule::Contacts,
            ContentModule::Events,
            ContentModule::TimeEntries,
        ] {
            assert!(p.allows(module, ContentAction::View));
            assert!(!p.allows(module, ContentAction::Create));
            assert!(!p.allows(module, ContentAction::Edit));
            assert!(!p.allows(module, ContentAction::Delete));
        }
    }

    #[test]
    fn test_missing_keys_deserialize_as_false() {
        // Older rows may predate a capability; absent keys must not grant it.
        let p: PermissionSet = serde_json::from_str(r#"{"view_notes": true}"#).expect("deserialize");
        assert!(p.view_notes);
        assert!(!p.edit_notes);
        assert!(!p.manage_project);
    }
}
