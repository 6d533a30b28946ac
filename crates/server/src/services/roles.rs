//! Role selection helpers.
//!
//! Invitations and role changes address a role either by numeric ID or by
//! name. Names are matched case-insensitively within the project's role list,
//! which also covers the "owner"/"editor"/"viewer" shorthands since the
//! seeded defaults carry exactly those names.

use crate::models::Role;

/// Resolve a role selector against a project's roles.
///
/// Numeric selectors match on ID first; anything else (or a number matching
/// no role) falls through to a case-insensitive name match.
#[must_use]
pub fn resolve<'r>(roles: &'r [Role], selector: &str) -> Option<&'r Role> {
    let selector = selector.trim();
    if let Ok(id) = selector.parse::<i32>()
        && let Some(role) = roles.iter().find(|r| r.id.as_i32() == id)
    {
        return Some(role);
    }
    roles
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(selector))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use cadence_core::{ProjectId, RoleId};

    use super::*;
    use crate::models::PermissionSet;

    fn role(id: i32, name: &str, is_default: bool) -> Role {
        Role {
            id: RoleId::new(id),
            project_id: ProjectId::new(1),
            name: name.to_owned(),
            description: String::new(),
            permissions: PermissionSet::viewer(),
            is_default,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolves_by_id() {
        let roles = vec![role(1, "Owner", true), role(2, "Editor", true)];
        let found = resolve(&roles, "2").expect("role");
        assert_eq!(found.name, "Editor");
    }

    #[test]
    fn test_resolves_by_name_case_insensitive() {
        let roles = vec![role(1, "Owner", true), role(4, "Release Manager", false)];
        let found = resolve(&roles, "release manager").expect("role");
        assert_eq!(found.id.as_i32(), 4);
    }

    #[test]
    fn test_shorthand_matches_seeded_defaults() {
        let roles = vec![
            role(1, "Owner", true),
            role(2, "Editor", true),
            role(3, "Viewer", true),
        ];
        assert_eq!(resolve(&roles, "viewer").map(|r| r.id.as_i32()), Some(3));
    }

    #[test]
    fn test_numeric_name_falls_through() {
        // A role literally named "7" is reachable when no role has ID 7.
        let roles = vec![role(1, "Owner", true), role(2, "7", false)];
        assert_eq!(resolve(&roles, "7").map(|r| r.id.as_i32()), Some(2));
    }

    #[test]
    fn test_unknown_selector_is_none() {
        let roles = vec![role(1, "Owner", true)];
        assert!(resolve(&roles, "Ghost").is_none());
    }
}
