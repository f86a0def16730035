// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for mutating operations.
//!
//! Updates and deletes on posts, comments and events are scoped to the
//! resource owner. A resource owned by someone else is reported as not
//! found, so callers cannot probe for ids they do not own.

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser, what: &str) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser, what: &str) -> StorageResult<()> {
        if self.owner_user_id() == user.user_id() {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %user.user_id(),
                resource = %what,
                "Ownership check failed"
            );
            Err(StorageError::NotFound(what.to_string()))
        }
    }
}

/// Extension trait to chain an ownership check onto a lookup.
pub trait OwnershipCheck<T> {
    /// Verify ownership and return the resource if authorized.
    fn verify_owner(self, user: &AuthenticatedUser, what: &str) -> StorageResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for StorageResult<T> {
    fn verify_owner(self, user: &AuthenticatedUser, what: &str) -> StorageResult<T> {
        let resource = self?;
        resource.verify_ownership(user, what)?;
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::authenticated;

    struct TestResource {
        owner: String,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> &str {
            &self.owner
        }
    }

    #[test]
    fn ownership_verification_passes_for_owner() {
        let resource = TestResource {
            owner: "user_123".to_string(),
        };
        let user = authenticated("user_123");

        assert!(resource.verify_ownership(&user, "Post p1").is_ok());
    }

    #[test]
    fn ownership_verification_hides_foreign_resource() {
        let resource = TestResource {
            owner: "user_123".to_string(),
        };
        let user = authenticated("user_456");

        let result = resource.verify_ownership(&user, "Post p1");
        assert!(matches!(result, Err(StorageError::NotFound(ref what)) if what == "Post p1"));
    }

    #[test]
    fn ownership_check_on_result() {
        let user = authenticated("user_123");

        let owned: StorageResult<TestResource> = Ok(TestResource {
            owner: "user_123".to_string(),
        });
        assert!(owned.verify_owner(&user, "x").is_ok());

        let missing: StorageResult<TestResource> =
            Err(StorageError::NotFound("Post gone".to_string()));
        assert!(matches!(
            missing.verify_owner(&user, "x"),
            Err(StorageError::NotFound(ref what)) if what == "Post gone"
        ));
    }
}
