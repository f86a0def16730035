// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};

use crate::models::User;

/// Claims carried by a session token.
///
/// Tokens have no expiry; a token stays valid until its session id is
/// removed from the user's allowlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Session id, looked up in the user's allowlist.
    pub sid: String,
}

/// The caller of an authenticated request.
///
/// Produced by the auth middleware after the token has been verified and
/// its session found on the user's allowlist.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The user record as loaded during authentication.
    pub user: User,
    /// Session id of the presented token.
    pub session_id: String,
    /// The raw bearer token.
    pub token: String,
}

impl AuthenticatedUser {
    /// Canonical user id.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
