//! Tasklane API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::path::Path;
use std::sync::Arc;

use tasklane_application::{
    AuthorizationGuard, CallerClaimsVerifier, OrganizationHierarchy, OrganizationService,
    OrganizationVisibilityService, PermissionResolver,
};
use tasklane_core::AppError;
use tasklane_infrastructure::{
    InMemoryOrganizationRepository, StaticClaimsVerifier, TimeoutOrganizationHierarchy,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let repository = Arc::new(match config.organization_seed_path.as_deref() {
        Some(path) => InMemoryOrganizationRepository::from_seed_json(&read_file(path).await?)?,
        None => InMemoryOrganizationRepository::new(),
    });

    let claims_verifier: Arc<dyn CallerClaimsVerifier> =
        Arc::new(match config.caller_tokens_path.as_deref() {
            Some(path) => StaticClaimsVerifier::from_json(&read_file(path).await?)?,
            None => {
                warn!("CALLER_TOKENS_PATH is not set, every protected request will be rejected");
                StaticClaimsVerifier::empty()
            }
        });

    let hierarchy: Arc<dyn OrganizationHierarchy> = Arc::new(TimeoutOrganizationHierarchy::new(
        repository.clone(),
        config.lookup_timeout,
    ));
    let resolver =
        PermissionResolver::new(hierarchy.clone()).with_max_depth(config.max_hierarchy_depth);
    let authorization_guard = AuthorizationGuard::new(resolver);
    let visibility = OrganizationVisibilityService::new(hierarchy)
        .with_max_depth(config.max_hierarchy_depth);

    let app_state = AppState {
        organization_service: OrganizationService::new(
            repository,
            authorization_guard.clone(),
            visibility,
        ),
        authorization_guard,
        claims_verifier,
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        max_hierarchy_depth = config.max_hierarchy_depth,
        lookup_timeout_ms = config.lookup_timeout.as_millis(),
        "tasklane-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn read_file(path: &Path) -> Result<String, AppError> {
    tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Validation(format!("failed to read '{}': {error}", path.display()))
    })
}
