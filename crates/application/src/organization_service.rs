use std::collections::BTreeSet;
use std::sync::Arc;

use tasklane_core::{AppError, AppResult, OrganizationId};
use tasklane_domain::{CallerIdentity, Organization, Permission};
use tracing::info;
use uuid::Uuid;

use crate::{AuthorizationGuard, OrganizationRepository, OrganizationVisibilityService};

/// Application service for organization hierarchy use-cases.
#[derive(Clone)]
pub struct OrganizationService {
    repository: Arc<dyn OrganizationRepository>,
    guard: AuthorizationGuard,
    visibility: OrganizationVisibilityService,
}

impl OrganizationService {
    /// Creates a new organization service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn OrganizationRepository>,
        guard: AuthorizationGuard,
        visibility: OrganizationVisibilityService,
    ) -> Self {
        Self {
            repository,
            guard,
            visibility,
        }
    }

    /// Creates an organization, optionally below an existing parent.
    ///
    /// Requires `CREATE_ORG` at the parent. Root organizations can only be
    /// created by callers holding the permission globally.
    pub async fn create_organization(
        &self,
        actor: &CallerIdentity,
        name: &str,
        parent_id: Option<OrganizationId>,
    ) -> AppResult<Organization> {
        self.guard
            .require(Some(actor), &[Permission::CreateOrg], parent_id.as_ref())
            .await?;

        if let Some(parent_id) = parent_id.as_ref() {
            if self.repository.find_organization(parent_id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "parent organization '{parent_id}' does not exist"
                )));
            }
        }

        let organization = Organization::new(
            OrganizationId::new(Uuid::new_v4().to_string())?,
            name,
            parent_id,
        )?;
        self.repository
            .save_organization(organization.clone())
            .await?;

        info!(
            subject = actor.subject(),
            organization_id = %organization.id(),
            parent_id = organization.parent_id().map(OrganizationId::as_str),
            "organization created"
        );

        Ok(organization)
    }

    /// Returns one organization.
    pub async fn find_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Organization> {
        self.repository
            .find_organization(organization_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("organization '{organization_id}'")))
    }

    /// Lists the direct children of an organization.
    pub async fn list_children(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<Organization>> {
        self.find_organization(organization_id).await?;
        self.repository
            .list_child_organizations(organization_id)
            .await
    }

    /// Lists an organization and all of its descendants.
    pub async fn list_descendants(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<OrganizationId>> {
        self.find_organization(organization_id).await?;
        Ok(self.visibility.descendants_of(organization_id).await)
    }

    /// Returns the organizations the caller can see.
    pub async fn visible_organizations(&self, actor: &CallerIdentity) -> BTreeSet<OrganizationId> {
        self.visibility.visible_organizations(actor).await
    }
}
