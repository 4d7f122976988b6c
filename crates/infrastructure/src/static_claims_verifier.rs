use std::collections::HashMap;

use async_trait::async_trait;
use tasklane_application::CallerClaimsVerifier;
use tasklane_core::{AppError, AppResult, CallerClaims};

/// Claims verifier backed by a fixed credential table.
///
/// Stands in for an external token service in development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticClaimsVerifier {
    tokens: HashMap<String, CallerClaims>,
}

impl StaticClaimsVerifier {
    /// Creates a verifier that recognizes no credentials.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a verifier from an in-memory credential table.
    #[must_use]
    pub fn new(tokens: HashMap<String, CallerClaims>) -> Self {
        Self { tokens }
    }

    /// Parses a JSON object mapping credentials to claims records.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let tokens: HashMap<String, CallerClaims> = serde_json::from_str(raw).map_err(|error| {
            AppError::Validation(format!("invalid caller token document: {error}"))
        })?;

        if tokens.keys().any(|token| token.trim().is_empty()) {
            return Err(AppError::Validation(
                "caller token document contains a blank credential".to_owned(),
            ));
        }

        Ok(Self::new(tokens))
    }

    /// Returns the number of known credentials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns whether no credential is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl CallerClaimsVerifier for StaticClaimsVerifier {
    async fn verify(&self, credential: &str) -> AppResult<Option<CallerClaims>> {
        Ok(self.tokens.get(credential).cloned())
    }
}

#[cfg(test)]
mod tests {
    use tasklane_application::CallerClaimsVerifier;
    use tasklane_core::AppError;

    use super::StaticClaimsVerifier;

    #[tokio::test]
    async fn known_credentials_return_claims() {
        let verifier = StaticClaimsVerifier::from_json(
            r#"{
                "admin-token": {
                    "sub": "alice",
                    "organizationId": "A",
                    "roles": [{"role": "ADMIN", "organizationId": "A"}]
                },
                "viewer-token": {"sub": "bob", "roles": ["VIEWER"]}
            }"#,
        );
        assert!(verifier.is_ok());
        let verifier = verifier.unwrap_or_default();
        assert_eq!(verifier.len(), 2);

        let claims = verifier.verify("admin-token").await.unwrap_or_default();
        assert!(claims.is_some());
        let claims = claims.unwrap_or_else(|| unreachable!());
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.home_organization(), Some("A"));
        assert_eq!(claims.roles.len(), 1);
    }

    #[tokio::test]
    async fn unknown_credentials_return_none() {
        let verifier = StaticClaimsVerifier::empty();
        assert!(verifier.is_empty());

        let claims = verifier.verify("nope").await;
        assert!(matches!(claims, Ok(None)));
    }

    #[test]
    fn invalid_documents_are_rejected() {
        assert!(matches!(
            StaticClaimsVerifier::from_json("[]"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            StaticClaimsVerifier::from_json(r#"{" ": {"sub": "x"}}"#),
            Err(AppError::Validation(_))
        ));
    }
}
