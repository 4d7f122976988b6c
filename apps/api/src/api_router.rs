use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tasklane_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;
mod guarded;


use cors::build_cors_layer;
use guarded::build_organization_read_routes;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/orgs",
            post(handlers::organizations::create_organization_handler),
        )
        .route(
            "/api/orgs/visible",
            get(handlers::organizations::visible_organizations_handler),
        )
        .route(
            "/api/authorization/check",
            post(handlers::authorization::check_permissions_handler),
        )
        .merge(build_organization_read_routes(app_state.clone()))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
