use axum::Json;
use axum::extract::Extension;
use tasklane_domain::CallerIdentity;

use crate::dto::CallerIdentityResponse;

pub async fn me_handler(
    Extension(identity): Extension<CallerIdentity>,
) -> Json<CallerIdentityResponse> {
    Json(CallerIdentityResponse::from(&identity))
}
