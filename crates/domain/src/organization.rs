use serde::{Deserialize, Serialize};
use tasklane_core::{AppResult, NonEmptyString, OrganizationId};

/// Minimal hierarchy record used for ancestry walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationLink {
    id: OrganizationId,
    parent_id: Option<OrganizationId>,
}

impl OrganizationLink {
    /// Creates a hierarchy record.
    #[must_use]
    pub fn new(id: OrganizationId, parent_id: Option<OrganizationId>) -> Self {
        Self { id, parent_id }
    }

    /// Returns the organization id.
    #[must_use]
    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    /// Returns the parent organization id, `None` for roots.
    #[must_use]
    pub fn parent_id(&self) -> Option<&OrganizationId> {
        self.parent_id.as_ref()
    }

    /// Returns whether this organization is a root of its tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Organization node in the organization forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    id: OrganizationId,
    name: NonEmptyString,
    parent_id: Option<OrganizationId>,
}

impl Organization {
    /// Creates an organization, validating its display name.
    pub fn new(
        id: OrganizationId,
        name: impl Into<String>,
        parent_id: Option<OrganizationId>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            parent_id,
        })
    }

    /// Returns the organization id.
    #[must_use]
    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the parent organization id.
    #[must_use]
    pub fn parent_id(&self) -> Option<&OrganizationId> {
        self.parent_id.as_ref()
    }

    /// Projects the organization to its hierarchy record.
    #[must_use]
    pub fn link(&self) -> OrganizationLink {
        OrganizationLink::new(self.id.clone(), self.parent_id.clone())
    }
}
