//! Permission helper functions for API handlers.
//!
//! Provides convenience functions to load and check access in a single
//! operation, so handlers never reimplement the role table.

use sqlx::PgPool;
use uuid::Uuid;

use super::models::TeamGrant;
use super::queries::fetch_resource_grants;
use super::resolver::{resolve_team_permissions, PermissionError, ResourcePermissions};
use crate::sharing::ResourceKind;

/// Pre-computed access context for one (resource, user) pair.
///
/// Carries everything a handler needs: the grants for the response body
/// and the effective permissions for enforcement.
#[derive(Debug, Clone)]
pub struct ResourceAccess {
    /// The resource owner's user id.
    pub owner_id: Uuid,

    /// Teams the resource is shared with, including membership rosters.
    pub grants: Vec<TeamGrant>,

    /// Effective permissions, ownership overlay included.
    pub permissions: ResourcePermissions,

    /// Whether the requesting user owns the resource.
    pub is_owner: bool,

    user_id: Uuid,
}

impl ResourceAccess {
    /// Whether the user may see the resource at all: owner, or a member of
    /// any team it is shared with (a viewer role is enough to view).
    #[must_use]
    pub fn can_view(&self) -> bool {
        self.is_owner || self.grants.iter().any(|g| g.has_member(self.user_id))
    }

    /// Visibility gate. Invisible resources read as not found rather than
    /// forbidden, so their existence is not leaked.
    pub fn require_view(&self) -> Result<(), PermissionError> {
        if self.can_view() {
            Ok(())
        } else {
            Err(PermissionError::NotVisible)
        }
    }

    pub fn require_edit(&self) -> Result<(), PermissionError> {
        self.require_view()?;
        if self.permissions.can_edit {
            Ok(())
        } else {
            Err(PermissionError::EditDenied)
        }
    }

    pub fn require_delete(&self) -> Result<(), PermissionError> {
        self.require_view()?;
        if self.permissions.can_delete {
            Ok(())
        } else {
            Err(PermissionError::DeleteDenied)
        }
    }

    /// Share management stays with the owner, whatever the team roles say.
    pub fn require_owner(&self) -> Result<(), PermissionError> {
        self.require_view()?;
        if self.is_owner {
            Ok(())
        } else {
            Err(PermissionError::OwnerOnly)
        }
    }
}

/// Build an access context from already-loaded grants.
pub fn compute_access(
    owner_id: Uuid,
    grants: Vec<TeamGrant>,
    user_id: Uuid,
) -> Result<ResourceAccess, PermissionError> {
    let is_owner = user_id == owner_id && !user_id.is_nil();
    let permissions = if is_owner {
        ResourcePermissions::ALL
    } else {
        resolve_team_permissions(&grants, user_id)?
    };

    Ok(ResourceAccess {
        owner_id,
        grants,
        permissions,
        is_owner,
        user_id,
    })
}

/// Load a resource's grants and compute the caller's access in one step.
#[tracing::instrument(skip(pool))]
pub async fn load_resource_access(
    pool: &PgPool,
    kind: ResourceKind,
    resource_id: Uuid,
    owner_id: Uuid,
    user_id: Uuid,
) -> Result<ResourceAccess, PermissionError> {
    let grants = fetch_resource_grants(pool, kind, resource_id)
        .await
        .map_err(|e| PermissionError::DatabaseError(e.to_string()))?;

    compute_access(owner_id, grants, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::models::TeamMemberRole;

    fn team_with(user_id: Uuid, role: &str) -> TeamGrant {
        TeamGrant {
            team_id: Uuid::new_v4(),
            name: "Phishing Drill Crew".to_string(),
            members: vec![TeamMemberRole {
                user_id,
                username: "bob".to_string(),
                role: role.to_string(),
            }],
        }
    }

    #[test]
    fn test_owner_access() {
        let owner = Uuid::new_v4();
        let access = compute_access(owner, vec![], owner).unwrap();
        assert!(access.is_owner);
        assert!(access.can_view());
        assert!(access.require_edit().is_ok());
        assert!(access.require_delete().is_ok());
        assert!(access.require_owner().is_ok());
    }

    #[test]
    fn test_viewer_can_view_but_not_edit() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let access = compute_access(owner, vec![team_with(user, "viewer")], user).unwrap();
        assert!(access.require_view().is_ok());
        assert_eq!(access.require_edit(), Err(PermissionError::EditDenied));
        assert_eq!(access.require_delete(), Err(PermissionError::DeleteDenied));
        assert_eq!(access.require_owner(), Err(PermissionError::OwnerOnly));
    }

    #[test]
    fn test_contributor_edits_but_cannot_delete() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let access = compute_access(owner, vec![team_with(user, "contributor")], user).unwrap();
        assert!(access.require_edit().is_ok());
        assert_eq!(access.require_delete(), Err(PermissionError::DeleteDenied));
    }

    #[test]
    fn test_team_admin_cannot_manage_shares() {
        // Full resource control still does not include the share list.
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let access = compute_access(owner, vec![team_with(user, "team_admin")], user).unwrap();
        assert!(access.require_edit().is_ok());
        assert!(access.require_delete().is_ok());
        assert_eq!(access.require_owner(), Err(PermissionError::OwnerOnly));
    }

    #[test]
    fn test_stranger_reads_as_not_found() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let access = compute_access(owner, vec![team_with(Uuid::new_v4(), "viewer")], user).unwrap();
        assert!(!access.can_view());
        assert_eq!(access.require_view(), Err(PermissionError::NotVisible));
        // Denied operations report invisibility, not their specific gate.
        assert_eq!(access.require_edit(), Err(PermissionError::NotVisible));
        assert_eq!(access.require_delete(), Err(PermissionError::NotVisible));
    }

    #[test]
    fn test_nil_user_is_a_contract_violation() {
        let owner = Uuid::new_v4();
        let result = compute_access(owner, vec![], Uuid::nil());
        assert!(matches!(result, Err(PermissionError::InvalidUser)));
    }
}
