use axum::Json;
use axum::extract::{Extension, State};
use tasklane_core::OrganizationId;
use tasklane_domain::{CallerIdentity, Permission};

use crate::dto::{AuthorizationCheckRequest, AuthorizationCheckResponse, PermissionCheckResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn check_permissions_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(payload): Json<AuthorizationCheckRequest>,
) -> ApiResult<Json<AuthorizationCheckResponse>> {
    let permissions = payload
        .permissions
        .iter()
        .map(|value| Permission::from_transport(value.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let organization_id = OrganizationId::from_optional(payload.organization_id.as_deref());

    let checks = state
        .authorization_guard
        .evaluate(&identity, permissions.as_slice(), organization_id.as_ref())
        .await;

    Ok(Json(AuthorizationCheckResponse {
        organization_id: organization_id.map(String::from),
        allowed: checks.iter().all(|check| check.allowed),
        checks: checks.into_iter().map(PermissionCheckResponse::from).collect(),
    }))
}
