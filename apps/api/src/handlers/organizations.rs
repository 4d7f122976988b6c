use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasklane_core::OrganizationId;
use tasklane_domain::CallerIdentity;

use crate::dto::{CreateOrganizationRequest, OrganizationIdsResponse, OrganizationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let organization = state
        .organization_service
        .create_organization(
            &identity,
            payload.name.as_str(),
            OrganizationId::from_optional(payload.parent_id.as_deref()),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse::from(organization)),
    ))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization_id = OrganizationId::new(organization_id)?;
    let organization = state
        .organization_service
        .find_organization(&organization_id)
        .await?;

    Ok(Json(OrganizationResponse::from(organization)))
}

pub async fn list_children_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organization_id = OrganizationId::new(organization_id)?;
    let children = state
        .organization_service
        .list_children(&organization_id)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(children))
}

pub async fn list_descendants_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<OrganizationIdsResponse>> {
    let organization_id = OrganizationId::new(organization_id)?;
    let descendants = state
        .organization_service
        .list_descendants(&organization_id)
        .await?;

    Ok(Json(descendants.iter().collect()))
}

pub async fn visible_organizations_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Json<OrganizationIdsResponse> {
    let visible = state
        .organization_service
        .visible_organizations(&identity)
        .await;

    Json(visible.iter().collect())
}
