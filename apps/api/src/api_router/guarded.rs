use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tasklane_application::RequiredPermissions;
use tasklane_domain::Permission;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_organization_read_routes(app_state: AppState) -> Router<AppState> {
    let read_rule = RequiredPermissions::new([Permission::ReadTask]);

    Router::new()
        .route(
            "/api/orgs/{organizationId}",
            get(handlers::organizations::get_organization_handler),
        )
        .route(
            "/api/orgs/{organizationId}/children",
            get(handlers::organizations::list_children_handler),
        )
        .route(
            "/api/orgs/{organizationId}/descendants",
            get(handlers::organizations::list_descendants_handler),
        )
        .route_layer(from_fn_with_state(app_state, middleware::require_permissions))
        .layer(axum::Extension(read_rule))
}
