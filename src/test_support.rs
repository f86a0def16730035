// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use tempfile::TempDir;

use crate::auth::{password::hash_password, AuthenticatedUser, TokenService};
use crate::models::{PersonName, User, COLLECTIONS};
use crate::state::AppState;
use crate::storage::DocumentDb;

/// Password used by [`register`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

const TEST_SECRET: &[u8] = b"test-signing-secret";

/// Open a fresh database in a temporary directory.
pub fn test_db() -> (TempDir, DocumentDb) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let db = DocumentDb::open(&temp.path().join("social.redb"), &COLLECTIONS)
        .expect("Failed to open database");
    (temp, db)
}

/// Application state over a fresh database.
pub fn test_state() -> (AppState, TempDir) {
    let (temp, db) = test_db();
    (AppState::new(db, TokenService::new(TEST_SECRET)), temp)
}

/// An unsaved user with a placeholder password hash.
pub fn sample_user(email: &str) -> User {
    User::new(
        email.to_string(),
        "$argon2id$placeholder".to_string(),
        PersonName {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        },
    )
}

/// An authenticated caller with the given id; nothing is stored.
pub fn authenticated(user_id: &str) -> AuthenticatedUser {
    let mut user = sample_user(&format!("{user_id}@example.com"));
    user.id = user_id.to_string();
    AuthenticatedUser {
        user,
        session_id: "test-session".to_string(),
        token: "test-token".to_string(),
    }
}

/// Store a user whose password is [`TEST_PASSWORD`] and log them in.
///
/// Returns the stored user and a valid token.
pub fn register(state: &AppState, email: &str) -> (User, String) {
    let mut user = sample_user(email);
    user.password_hash = hash_password(TEST_PASSWORD).expect("hashing succeeds");
    state.users().create(&user).expect("user is stored");

    let token = state
        .tokens
        .issue(&state.users(), &user.id)
        .expect("token is issued");
    let user = state.users().get(&user.id).expect("user is readable");
    (user, token)
}
