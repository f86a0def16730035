// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are stored in the `users` collection; the `user_emails` index keeps
//! emails unique. Both are always written in the same transaction.

use chrono::Utc;

use crate::models::User;
use crate::storage::{DocumentDb, StorageError, StorageResult, USER_EMAILS};

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a DocumentDb,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a DocumentDb) -> Self {
        Self { db }
    }

    /// Store a newly registered user.
    ///
    /// Fails with `AlreadyExists` if the email is taken.
    pub fn create(&self, user: &User) -> StorageResult<()> {
        self.db.write(|scope| {
            if scope.index_get(USER_EMAILS, &user.email)?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "User with email {}",
                    user.email
                )));
            }
            scope.insert(user)?;
            scope.index_put(USER_EMAILS, &user.email, &user.id)
        })
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<User> {
        self.db.fetch(user_id)
    }

    /// Get a user by ID, `None` if absent.
    pub fn find(&self, user_id: &str) -> StorageResult<Option<User>> {
        self.db.get(user_id)
    }

    /// Look up a user by email (normalized before lookup).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        match self.db.index_lookup(USER_EMAILS, &normalize_email(email))? {
            Some(user_id) => self.find(&user_id),
            None => Ok(None),
        }
    }

    /// Apply a profile change.
    pub fn update(&self, user_id: &str, change: impl FnOnce(&mut User)) -> StorageResult<User> {
        let (user, ()) = self.db.update::<User, _>(user_id, |user| {
            change(user);
            user.updated_at = Utc::now();
            Ok(())
        })?;
        Ok(user)
    }

    /// Add a session id to the user's allowlist.
    pub fn add_session(&self, user_id: &str, session_id: &str) -> StorageResult<User> {
        let (user, ()) = self.db.update::<User, _>(user_id, |user| {
            user.sessions.insert(session_id.to_string());
            Ok(())
        })?;
        Ok(user)
    }

    /// Remove a session id from the allowlist. Returns whether it was present.
    pub fn remove_session(&self, user_id: &str, session_id: &str) -> StorageResult<bool> {
        let (_, removed) = self
            .db
            .update::<User, _>(user_id, |user| Ok(user.sessions.remove(session_id)))?;
        Ok(removed)
    }

    /// Empty the allowlist. Returns how many sessions were revoked.
    pub fn clear_sessions(&self, user_id: &str) -> StorageResult<usize> {
        let (_, revoked) = self.db.update::<User, _>(user_id, |user| {
            let revoked = user.sessions.len();
            user.sessions.clear();
            Ok(revoked)
        })?;
        Ok(revoked)
    }

    /// Delete a user and release their email.
    pub fn delete(&self, user_id: &str) -> StorageResult<User> {
        self.db.write(|scope| {
            let user = scope
                .remove::<User>(user_id)?
                .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))?;
            scope.index_remove(USER_EMAILS, &user.email)?;
            Ok(user)
        })
    }
}
