use serde::{Deserialize, Serialize};
use tasklane_application::PermissionCheck;
use tasklane_core::OrganizationId;
use tasklane_domain::{CallerGrants, CallerIdentity, Organization, RoleAssignment};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of one role assignment.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub role: String,
    pub organization_id: Option<String>,
}

impl From<&RoleAssignment> for RoleAssignmentResponse {
    fn from(value: &RoleAssignment) -> Self {
        Self {
            role: value.role().as_str().to_owned(),
            organization_id: value.organization_id().map(|id| id.as_str().to_owned()),
        }
    }
}

/// API representation of the authenticated caller.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/caller-identity-response.ts"
)]
pub struct CallerIdentityResponse {
    pub subject: String,
    pub email: Option<String>,
    pub organization_id: Option<String>,
    pub roles: Vec<RoleAssignmentResponse>,
    /// Present only when the caller carries a precomputed permission list.
    pub permissions: Option<Vec<String>>,
}

impl From<&CallerIdentity> for CallerIdentityResponse {
    fn from(identity: &CallerIdentity) -> Self {
        let permissions = match identity.grants() {
            CallerGrants::PrecomputedPermissions(permissions) => Some(
                permissions
                    .iter()
                    .map(|permission| permission.as_str().to_owned())
                    .collect(),
            ),
            CallerGrants::RoleAssignments(_) => None,
        };

        Self {
            subject: identity.subject().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            organization_id: identity
                .organization_id()
                .map(|id| id.as_str().to_owned()),
            roles: identity
                .grants()
                .role_assignments()
                .iter()
                .map(RoleAssignmentResponse::from)
                .collect(),
            permissions,
        }
    }
}

/// Incoming payload for organization creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-organization-request.ts"
)]
pub struct CreateOrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// API representation of an organization.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/organization-response.ts"
)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            parent_id: value.parent_id().map(|id| id.as_str().to_owned()),
        }
    }
}

/// List of organization ids.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/organization-ids-response.ts"
)]
pub struct OrganizationIdsResponse {
    pub organization_ids: Vec<String>,
}

impl<'a> FromIterator<&'a OrganizationId> for OrganizationIdsResponse {
    fn from_iter<I: IntoIterator<Item = &'a OrganizationId>>(iter: I) -> Self {
        Self {
            organization_ids: iter.into_iter().map(|id| id.as_str().to_owned()).collect(),
        }
    }
}

/// Incoming payload for an ad-hoc permission evaluation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorization-check-request.ts"
)]
pub struct AuthorizationCheckRequest {
    #[serde(default)]
    pub organization_id: Option<String>,
    pub permissions: Vec<String>,
}

/// Outcome for one evaluated permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-check-response.ts"
)]
pub struct PermissionCheckResponse {
    pub permission: String,
    pub allowed: bool,
}

impl From<PermissionCheck> for PermissionCheckResponse {
    fn from(value: PermissionCheck) -> Self {
        Self {
            permission: value.permission.as_str().to_owned(),
            allowed: value.allowed,
        }
    }
}

/// Result of an ad-hoc permission evaluation.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorization-check-response.ts"
)]
pub struct AuthorizationCheckResponse {
    pub organization_id: Option<String>,
    /// Whether every requested permission resolved.
    pub allowed: bool,
    pub checks: Vec<PermissionCheckResponse>,
}
