use std::sync::Arc;

use tasklane_application::{AuthorizationGuard, CallerClaimsVerifier, OrganizationService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_guard: AuthorizationGuard,
    pub organization_service: OrganizationService,
    pub claims_verifier: Arc<dyn CallerClaimsVerifier>,
}
