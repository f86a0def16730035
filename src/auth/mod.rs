// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token sessions for the social API.
//!
//! ## Auth Flow
//!
//! 1. `POST /auth/login` checks the password against the stored Argon2 hash
//! 2. A new session id is added to the user's allowlist and a signed token
//!    carrying `sub` (user id) and `sid` (session id) is returned
//! 3. Protected requests send `Authorization: Bearer <token>`; the
//!    middleware verifies the signature, loads the user and requires the
//!    session id to still be on the allowlist
//! 4. Logout removes the session id; logout-all clears the allowlist
//!
//! ## Security
//!
//! - Tokens are HS256, signed with `JWT_SECRET`
//! - Tokens do not expire; revocation goes through the allowlist
//! - Only Argon2 PHC strings are stored, never passwords

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use tokens::TokenService;
