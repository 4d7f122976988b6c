//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_organization_repository;
mod static_claims_verifier;
mod timeout_organization_hierarchy;

pub use in_memory_organization_repository::InMemoryOrganizationRepository;
pub use static_claims_verifier::StaticClaimsVerifier;
pub use timeout_organization_hierarchy::TimeoutOrganizationHierarchy;
