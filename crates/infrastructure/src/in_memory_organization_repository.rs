use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tasklane_application::{OrganizationHierarchy, OrganizationRepository};
use tasklane_core::{AppError, AppResult, OrganizationId};
use tasklane_domain::{Organization, OrganizationLink};
use tokio::sync::RwLock;
use tracing::debug;

#[cfg(test)]
mod tests;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedOrganization {
    id: OrganizationId,
    name: String,
    #[serde(default)]
    parent_id: Option<String>,
}

/// In-memory organization repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryOrganizationRepository {
    organizations: RwLock<HashMap<OrganizationId, Organization>>,
}

impl InMemoryOrganizationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding a complete forest.
    ///
    /// Records may appear in any order, but every parent must be part of the
    /// same batch and ids must be unique.
    pub fn from_organizations(organizations: Vec<Organization>) -> AppResult<Self> {
        let mut indexed = HashMap::with_capacity(organizations.len());

        for organization in organizations {
            let id = organization.id().clone();
            if indexed.insert(id.clone(), organization).is_some() {
                return Err(AppError::Conflict(format!(
                    "organization '{id}' is declared more than once"
                )));
            }
        }

        for organization in indexed.values() {
            if let Some(parent_id) = organization.parent_id() {
                if !indexed.contains_key(parent_id) {
                    return Err(AppError::Validation(format!(
                        "organization '{}' references unknown parent '{parent_id}'",
                        organization.id()
                    )));
                }
            }
        }

        debug!(organizations = indexed.len(), "organization forest loaded");

        Ok(Self {
            organizations: RwLock::new(indexed),
        })
    }

    /// Parses a JSON array of `{ "id", "name", "parentId" }` records.
    pub fn from_seed_json(raw: &str) -> AppResult<Self> {
        let records: Vec<SeedOrganization> = serde_json::from_str(raw).map_err(|error| {
            AppError::Validation(format!("invalid organization seed document: {error}"))
        })?;

        let organizations = records
            .into_iter()
            .map(|record| {
                Organization::new(
                    record.id,
                    record.name,
                    OrganizationId::from_optional(record.parent_id.as_deref()),
                )
            })
            .collect::<AppResult<Vec<_>>>()?;

        Self::from_organizations(organizations)
    }

    async fn children_of(&self, organization_id: &OrganizationId) -> Vec<Organization> {
        let organizations = self.organizations.read().await;

        let mut children: Vec<Organization> = organizations
            .values()
            .filter(|organization| organization.parent_id() == Some(organization_id))
            .cloned()
            .collect();
        children.sort_by(|left, right| left.id().cmp(right.id()));

        children
    }
}

#[async_trait]
impl OrganizationHierarchy for InMemoryOrganizationRepository {
    async fn resolve(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Option<OrganizationLink>> {
        Ok(self
            .organizations
            .read()
            .await
            .get(organization_id)
            .map(Organization::link))
    }

    async fn list_children(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<OrganizationLink>> {
        Ok(self
            .children_of(organization_id)
            .await
            .iter()
            .map(Organization::link)
            .collect())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn save_organization(&self, organization: Organization) -> AppResult<()> {
        let mut organizations = self.organizations.write().await;

        if organizations.contains_key(organization.id()) {
            return Err(AppError::Conflict(format!(
                "organization '{}' already exists",
                organization.id()
            )));
        }

        if let Some(parent_id) = organization.parent_id() {
            if !organizations.contains_key(parent_id) {
                return Err(AppError::Validation(format!(
                    "parent organization '{parent_id}' does not exist"
                )));
            }
        }

        organizations.insert(organization.id().clone(), organization);
        Ok(())
    }

    async fn find_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self
            .organizations
            .read()
            .await
            .get(organization_id)
            .cloned())
    }

    async fn list_child_organizations(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<Organization>> {
        Ok(self.children_of(organization_id).await)
    }
}
