use std::collections::HashMap;

use axum::body::{Body, to_bytes};
use axum::extract::{FromRequestParts, Query, RawPathParams, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;
use tasklane_application::{RequiredPermissions, ResourceScopeSources};
use tasklane_core::AppError;
use tasklane_domain::CallerIdentity;

use crate::error::ApiResult;
use crate::state::AppState;

const MAX_GUARDED_BODY_BYTES: usize = 1024 * 1024;

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let credential = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let claims = state
        .claims_verifier
        .verify(credential)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_owned()))?;
    let identity = CallerIdentity::from_claims(&claims)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_permissions(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let (mut parts, body) = request.into_parts();

    let required = parts
        .extensions
        .get::<RequiredPermissions>()
        .cloned()
        .ok_or_else(|| {
            AppError::Internal("guarded route is missing its required permissions".to_owned())
        })?;

    let path_params: HashMap<String, String> = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect()
        })
        .unwrap_or_default();
    let query_params = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .unwrap_or_default();

    let bytes = to_bytes(body, MAX_GUARDED_BODY_BYTES)
        .await
        .map_err(|error| AppError::Validation(format!("failed to read request body: {error}")))?;
    let json_body = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice::<Value>(&bytes).ok()
    };

    let resource_organization_id = ResourceScopeSources::new()
        .with_path_params(path_params)
        .with_query_params(query_params)
        .with_body(json_body)
        .resource_organization_id();

    state
        .authorization_guard
        .require(
            parts.extensions.get::<CallerIdentity>(),
            required.as_slice(),
            resource_organization_id.as_ref(),
        )
        .await?;

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
