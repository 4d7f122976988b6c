//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod identity;
mod organization;
mod role_assignment;
mod security;

pub use catalog::{RolePermissionCatalog, RolePolicy};
pub use identity::{CallerGrants, CallerIdentity};
pub use organization::{Organization, OrganizationLink};
pub use role_assignment::RoleAssignment;
pub use security::{Permission, Role};
