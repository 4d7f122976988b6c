use async_trait::async_trait;
use tasklane_core::{AppResult, CallerClaims, OrganizationId};
use tasklane_domain::{Organization, OrganizationLink};

/// Read port over the organization forest.
///
/// Unknown ids resolve to `Ok(None)`. An `Err` means the lookup itself failed
/// (transport, timeout) and callers decide how to degrade.
#[async_trait]
pub trait OrganizationHierarchy: Send + Sync {
    /// Resolves one organization to its id and parent id.
    async fn resolve(&self, organization_id: &OrganizationId)
    -> AppResult<Option<OrganizationLink>>;

    /// Lists the direct children of an organization.
    async fn list_children(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<OrganizationLink>>;
}

/// Repository port for organization records.
#[async_trait]
pub trait OrganizationRepository: OrganizationHierarchy {
    /// Persists a new organization.
    async fn save_organization(&self, organization: Organization) -> AppResult<()>;

    /// Finds one organization by id.
    async fn find_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Option<Organization>>;

    /// Lists full records of the direct children of an organization.
    async fn list_child_organizations(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<Organization>>;
}

/// Port to the external step that turns a bearer credential into trusted claims.
#[async_trait]
pub trait CallerClaimsVerifier: Send + Sync {
    /// Returns the claims for a credential, or `None` when it is not recognized.
    async fn verify(&self, credential: &str) -> AppResult<Option<CallerClaims>>;
}
