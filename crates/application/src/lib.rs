//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_guard;
mod organization_ports;
mod organization_service;
mod organization_visibility_service;
mod permission_resolver;
mod resource_scope;

pub use authorization_guard::{
    AuthorizationDecision, AuthorizationGuard, DenyReason, PermissionCheck, RequiredPermissions,
};
pub use organization_ports::{CallerClaimsVerifier, OrganizationHierarchy, OrganizationRepository};
pub use organization_service::OrganizationService;
pub use organization_visibility_service::OrganizationVisibilityService;
pub use permission_resolver::{DEFAULT_MAX_HIERARCHY_DEPTH, PermissionResolver, ResolutionCache};
pub use resource_scope::ResourceScopeSources;
