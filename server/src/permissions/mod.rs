//! Permission system types and utilities.
//!
//! Team-scoped role-based access control for shared resources:
//! - A resource (campaign, group, scenario) is owned by one user
//! - Sharing it with a team grants each member the reach of their role
//! - The owner always keeps full control

pub mod helpers;
pub mod models;
pub mod queries;
pub mod resolver;
pub mod role;

pub use helpers::{compute_access, load_resource_access, ResourceAccess};
pub use models::{TeamGrant, TeamMemberRole};
pub use queries::{fetch_grants_for_resources, fetch_resource_grants};
pub use resolver::{
    resolve_effective_permissions, resolve_team_permissions, PermissionError, ResourcePermissions,
};
pub use role::TeamRole;
