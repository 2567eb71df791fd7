//! Caller identity resolution and resource ownership.
//!
//! The gateway hands every authenticated request an opaque identifier. It
//! becomes a [`CustomerId`] through [`IdentityResolver::resolve_customer_id`];
//! addresses and orders are then only visible to the customer that owns them
//! ([`authorize_ownership`]).

use std::future::Future;

use thiserror::Error;

use hayat_core::CustomerId;

use crate::db::{CustomerRepository, RepositoryError};
use crate::models::CallerIdentity;

/// Errors from identity resolution and ownership checks.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No customer is registered for the identifier.
    #[error("no customer registered for this identity")]
    CustomerNotFound,

    /// The resource belongs to a different customer.
    #[error("resource belongs to another customer")]
    Forbidden,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Lookup of customer ids by gateway identifier.
pub trait CustomerDirectory {
    /// Find the customer registered for `identifier`.
    fn find_customer_id(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<CustomerId>, RepositoryError>> + Send;
}

impl CustomerDirectory for CustomerRepository<'_> {
    async fn find_customer_id(&self, identifier: &str) -> Result<Option<CustomerId>, RepositoryError> {
        self.find_id_by_identifier(identifier).await
    }
}

/// Maps a caller's identity onto their customer record.
pub struct IdentityResolver<D> {
    directory: D,
}

impl<D: CustomerDirectory> IdentityResolver<D> {
    #[must_use]
    pub const fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Resolve the caller to a customer id.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::CustomerNotFound` if nobody is registered under
    /// the identifier, `IdentityError::Repository` if the lookup fails.
    pub async fn resolve_customer_id(&self, identity: &CallerIdentity) -> Result<CustomerId, IdentityError> {
        self.directory
            .find_customer_id(identity.as_str())
            .await?
            .ok_or(IdentityError::CustomerNotFound)
    }
}

/// Allow access only when the caller owns the resource.
///
/// # Errors
///
/// Returns `IdentityError::Forbidden` when the ids differ.
pub fn authorize_ownership(resource_owner: CustomerId, caller: CustomerId) -> Result<(), IdentityError> {
    if resource_owner == caller {
        Ok(())
    } else {
        Err(IdentityError::Forbidden)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct FakeDirectory(HashMap<&'static str, CustomerId>);

    impl CustomerDirectory for FakeDirectory {
        async fn find_customer_id(&self, identifier: &str) -> Result<Option<CustomerId>, RepositoryError> {
            Ok(self.0.get(identifier).copied())
        }
    }

    struct BrokenDirectory;

    impl CustomerDirectory for BrokenDirectory {
        async fn find_customer_id(&self, _identifier: &str) -> Result<Option<CustomerId>, RepositoryError> {
            Err(RepositoryError::DataCorruption("boom".to_string()))
        }
    }

    fn resolver() -> IdentityResolver<FakeDirectory> {
        IdentityResolver::new(FakeDirectory(HashMap::from([("u-42", CustomerId::new(7))])))
    }

    #[tokio::test]
    async fn test_resolves_known_identity() {
        let identity = CallerIdentity::new("u-42").unwrap();
        let id = resolver().resolve_customer_id(&identity).await.unwrap();
        assert_eq!(id, CustomerId::new(7));
    }

    #[tokio::test]
    async fn test_unknown_identity_is_not_found() {
        let identity = CallerIdentity::new("u-404").unwrap();
        let err = resolver().resolve_customer_id(&identity).await.unwrap_err();
        assert!(matches!(err, IdentityError::CustomerNotFound));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let identity = CallerIdentity::new("u-42").unwrap();
        let err = IdentityResolver::new(BrokenDirectory)
            .resolve_customer_id(&identity)
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Repository(_)));
    }

    #[test]
    fn test_owner_is_authorized() {
        assert!(authorize_ownership(CustomerId::new(7), CustomerId::new(7)).is_ok());
    }

    #[test]
    fn test_other_customers_are_forbidden() {
        for (owner, caller) in [(7, 8), (8, 7), (1, 0), (-1, 1)] {
            let result = authorize_ownership(CustomerId::new(owner), CustomerId::new(caller));
            assert!(matches!(result, Err(IdentityError::Forbidden)), "{owner} vs {caller}");
        }
    }
}
