//! Permission resolution logic.
//!
//! Computes what a user may do with a team-shared resource.
//!
//! Resolution order:
//! 1. The resource owner has all permissions (applied by
//!    [`resolve_effective_permissions`], not by the raw resolver)
//! 2. Every shared team the user is a member of contributes the
//!    permissions of their role in that team
//! 3. Contributions accumulate by OR: once granted, a permission is never
//!    taken away by a lower role in another team

use serde::Serialize;
use uuid::Uuid;

use super::models::TeamGrant;
use super::role::TeamRole;

/// Derived per-(resource, user) permissions. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ResourcePermissions {
    pub can_edit: bool,
    pub can_delete: bool,
}

impl ResourcePermissions {
    /// No access beyond viewing.
    pub const NONE: Self = Self {
        can_edit: false,
        can_delete: false,
    };

    /// Full control, as held by the resource owner.
    pub const ALL: Self = Self {
        can_edit: true,
        can_delete: true,
    };

    /// Combine two permission sets; grants accumulate.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            can_edit: self.can_edit || other.can_edit,
            can_delete: self.can_delete || other.can_delete,
        }
    }

    /// Whether every grant in `other` is also present here.
    #[must_use]
    pub const fn covers(self, other: Self) -> bool {
        (self.can_edit || !other.can_edit) && (self.can_delete || !other.can_delete)
    }
}

/// Compute the permissions a user's team roles grant on a resource.
///
/// Ownership is deliberately not considered here; the function is a pure
/// fold over the share list. A missing membership contributes nothing, and
/// an unrecognized role slug is treated as no privilege and logged.
///
/// The only rejected input is a nil user id, which signals a caller bug
/// rather than an authorization outcome.
pub fn resolve_team_permissions(
    resource_teams: &[TeamGrant],
    user_id: Uuid,
) -> Result<ResourcePermissions, PermissionError> {
    if user_id.is_nil() {
        return Err(PermissionError::InvalidUser);
    }

    let mut perms = ResourcePermissions::NONE;

    for team in resource_teams {
        let Some(member) = team.members.iter().find(|m| m.user_id == user_id) else {
            continue;
        };

        match TeamRole::from_slug(&member.role) {
            Some(role) => perms = perms.union(role.grants()),
            None => {
                tracing::warn!(
                    team_id = %team.team_id,
                    user_id = %user_id,
                    role = %member.role,
                    "unrecognized team role, treating as no privilege"
                );
            }
        }
    }

    Ok(perms)
}

/// Compute effective permissions including the ownership overlay.
///
/// The owner gets full control regardless of any team role, including a
/// viewer-only membership.
pub fn resolve_effective_permissions(
    owner_id: Uuid,
    resource_teams: &[TeamGrant],
    user_id: Uuid,
) -> Result<ResourcePermissions, PermissionError> {
    if user_id.is_nil() {
        return Err(PermissionError::InvalidUser);
    }
    if user_id == owner_id {
        return Ok(ResourcePermissions::ALL);
    }
    resolve_team_permissions(resource_teams, user_id)
}

/// Permission check errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The requesting user id is nil; a caller-side contract violation.
    #[error("Invalid requesting user")]
    InvalidUser,

    /// The resource is neither owned by nor shared with the user.
    #[error("Resource not found")]
    NotVisible,

    /// Update requires edit permission.
    #[error("You don't have permission to edit this resource")]
    EditDenied,

    /// Deletion requires delete permission.
    #[error("You don't have permission to delete this resource")]
    DeleteDenied,

    /// Only the resource owner may perform this action.
    #[error("Only the owner may perform this action")]
    OwnerOnly,

    /// Database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::models::TeamMemberRole;

    fn member(user_id: Uuid, role: &str) -> TeamMemberRole {
        TeamMemberRole {
            user_id,
            username: format!("user-{user_id}"),
            role: role.to_string(),
        }
    }

    fn team(members: Vec<TeamMemberRole>) -> TeamGrant {
        TeamGrant {
            team_id: Uuid::new_v4(),
            name: "Red Team".to_string(),
            members,
        }
    }

    #[test]
    fn test_empty_team_list_grants_nothing() {
        let user = Uuid::new_v4();
        let perms = resolve_team_permissions(&[], user).unwrap();
        assert_eq!(perms, ResourcePermissions::NONE);
    }

    #[test]
    fn test_team_admin_grants_edit_and_delete() {
        let user = Uuid::new_v4();
        let teams = [team(vec![member(user, "team_admin")])];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert_eq!(perms, ResourcePermissions::ALL);
    }

    #[test]
    fn test_contributor_grants_edit_only() {
        let user = Uuid::new_v4();
        let teams = [team(vec![member(user, "contributor")])];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert!(perms.can_edit);
        assert!(!perms.can_delete);
    }

    #[test]
    fn test_viewer_grants_nothing() {
        let user = Uuid::new_v4();
        let teams = [
            team(vec![member(user, "viewer")]),
            team(vec![member(user, "viewer")]),
        ];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert_eq!(perms, ResourcePermissions::NONE);
    }

    #[test]
    fn test_absent_membership_contributes_nothing() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let teams = [team(vec![member(other, "team_admin")])];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert_eq!(perms, ResourcePermissions::NONE);
    }

    #[test]
    fn test_highest_privilege_wins_across_teams() {
        // Viewer in team A, contributor in team B: edit, no delete.
        let user = Uuid::new_v4();
        let teams = [
            team(vec![member(user, "viewer")]),
            team(vec![member(user, "contributor")]),
        ];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert_eq!(
            perms,
            ResourcePermissions {
                can_edit: true,
                can_delete: false
            }
        );
    }

    #[test]
    fn test_grants_accumulate_regardless_of_order() {
        let user = Uuid::new_v4();
        let forward = [
            team(vec![member(user, "team_admin")]),
            team(vec![member(user, "viewer")]),
        ];
        let reverse = [
            team(vec![member(user, "viewer")]),
            team(vec![member(user, "team_admin")]),
        ];
        assert_eq!(
            resolve_team_permissions(&forward, user).unwrap(),
            resolve_team_permissions(&reverse, user).unwrap()
        );
    }

    #[test]
    fn test_monotonicity_adding_membership_never_shrinks() {
        let user = Uuid::new_v4();
        let base = vec![team(vec![member(user, "viewer")])];
        let before = resolve_team_permissions(&base, user).unwrap();

        let mut extended = base;
        extended.push(team(vec![member(user, "team_admin")]));
        let after = resolve_team_permissions(&extended, user).unwrap();

        assert!(after.covers(before));
    }

    #[test]
    fn test_unknown_role_is_no_privilege_not_error() {
        let user = Uuid::new_v4();
        let teams = [team(vec![member(user, "superuser")])];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert_eq!(perms, ResourcePermissions::NONE);
    }

    #[test]
    fn test_unknown_role_does_not_erase_earlier_grant() {
        let user = Uuid::new_v4();
        let teams = [
            team(vec![member(user, "contributor")]),
            team(vec![member(user, "superuser")]),
        ];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert!(perms.can_edit);
    }

    #[test]
    fn test_nil_user_rejected() {
        let result = resolve_team_permissions(&[], Uuid::nil());
        assert_eq!(result, Err(PermissionError::InvalidUser));
    }

    #[test]
    fn test_owner_gets_full_control_without_teams() {
        let owner = Uuid::new_v4();
        let perms = resolve_effective_permissions(owner, &[], owner).unwrap();
        assert_eq!(perms, ResourcePermissions::ALL);
    }

    #[test]
    fn test_ownership_overrides_viewer_role() {
        let owner = Uuid::new_v4();
        let teams = [team(vec![member(owner, "viewer")])];
        let perms = resolve_effective_permissions(owner, &teams, owner).unwrap();
        assert_eq!(perms, ResourcePermissions::ALL);
    }

    #[test]
    fn test_non_owner_falls_through_to_team_roles() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let teams = [team(vec![member(user, "contributor")])];
        let perms = resolve_effective_permissions(owner, &teams, user).unwrap();
        assert_eq!(
            perms,
            ResourcePermissions {
                can_edit: true,
                can_delete: false
            }
        );
    }

    #[test]
    fn test_stranger_gets_nothing() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let teams = [team(vec![member(Uuid::new_v4(), "team_admin")])];
        let perms = resolve_effective_permissions(owner, &teams, user).unwrap();
        assert_eq!(perms, ResourcePermissions::NONE);
    }

    #[test]
    fn test_union_and_covers() {
        let edit = ResourcePermissions {
            can_edit: true,
            can_delete: false,
        };
        assert_eq!(edit.union(ResourcePermissions::NONE), edit);
        assert_eq!(edit.union(ResourcePermissions::ALL), ResourcePermissions::ALL);
        assert!(ResourcePermissions::ALL.covers(edit));
        assert!(!edit.covers(ResourcePermissions::ALL));
        assert!(edit.covers(edit));
    }
}
