//! End-to-end properties of the team permission resolver, exercised
//! through the crate's public API the way handlers use it.

use uuid::Uuid;

use angler_server::permissions::{
    compute_access, resolve_effective_permissions, resolve_team_permissions, PermissionError,
    ResourcePermissions, TeamGrant, TeamMemberRole, TeamRole,
};

fn member(user_id: Uuid, role: &str) -> TeamMemberRole {
    TeamMemberRole {
        user_id,
        username: format!("user-{user_id}"),
        role: role.to_string(),
    }
}

fn team(name: &str, members: Vec<TeamMemberRole>) -> TeamGrant {
    TeamGrant {
        team_id: Uuid::new_v4(),
        name: name.to_string(),
        members,
    }
}

#[test]
fn permissions_accumulate_across_teams() {
    let user = Uuid::new_v4();
    let teams = vec![
        team("Awareness", vec![member(user, "viewer")]),
        team("Red Team", vec![member(user, "contributor")]),
    ];

    let perms = resolve_team_permissions(&teams, user).unwrap();
    assert!(perms.can_edit);
    assert!(!perms.can_delete);
}

#[test]
fn grants_never_shrink_as_teams_are_added() {
    // Adding a share can only widen what a user may do.
    let user = Uuid::new_v4();
    let mut teams = Vec::new();
    let mut previous = ResourcePermissions::NONE;

    for role in ["viewer", "team_admin", "viewer", "contributor"] {
        teams.push(team("T", vec![member(user, role)]));
        let current = resolve_team_permissions(&teams, user).unwrap();
        assert!(current.covers(previous));
        previous = current;
    }
}

#[test]
fn resolution_is_order_independent() {
    let user = Uuid::new_v4();
    let a = team("A", vec![member(user, "viewer")]);
    let b = team("B", vec![member(user, "team_admin")]);

    let forward = resolve_team_permissions(&[a.clone(), b.clone()], user).unwrap();
    let backward = resolve_team_permissions(&[b, a], user).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn owner_keeps_full_control_despite_low_team_role() {
    let owner = Uuid::new_v4();
    let teams = vec![team("Awareness", vec![member(owner, "viewer")])];

    let perms = resolve_effective_permissions(owner, &teams, owner).unwrap();
    assert_eq!(perms, ResourcePermissions::ALL);
}

#[test]
fn unknown_role_is_ignored_not_fatal() {
    let user = Uuid::new_v4();
    let teams = vec![
        team("Future", vec![member(user, "auditor")]),
        team("Red Team", vec![member(user, "viewer")]),
    ];

    // The unrecognized slug contributes nothing; resolution still succeeds.
    let perms = resolve_team_permissions(&teams, user).unwrap();
    assert_eq!(perms, ResourcePermissions::NONE);
}

#[test]
fn nil_user_is_rejected_up_front() {
    assert_eq!(
        resolve_team_permissions(&[], Uuid::nil()),
        Err(PermissionError::InvalidUser)
    );
    assert!(matches!(
        resolve_effective_permissions(Uuid::new_v4(), &[], Uuid::nil()),
        Err(PermissionError::InvalidUser)
    ));
}

#[test]
fn access_context_matches_raw_resolution() {
    let owner = Uuid::new_v4();
    let user = Uuid::new_v4();
    let teams = vec![team("Red Team", vec![member(user, "contributor")])];

    let access = compute_access(owner, teams.clone(), user).unwrap();
    let raw = resolve_team_permissions(&teams, user).unwrap();

    assert_eq!(access.permissions, raw);
    assert!(!access.is_owner);
    assert!(access.can_view());
    assert!(access.require_edit().is_ok());
    assert!(access.require_delete().is_err());
}

#[test]
fn every_role_slug_resolves_to_its_documented_grant() {
    let user = Uuid::new_v4();
    for role in TeamRole::ALL {
        let teams = vec![team("T", vec![member(user, role.as_slug())])];
        let perms = resolve_team_permissions(&teams, user).unwrap();
        assert_eq!(perms, role.grants());
    }
}
