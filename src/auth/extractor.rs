// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::authenticate, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Reuses the user stored by [`require_auth`](super::middleware::require_auth)
/// when present, otherwise authenticates the request itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_post(
///     Auth(user): Auth,
///     State(state): State<AppState>,
///     JsonBody(request): JsonBody<CreatePostRequest>,
/// ) -> Result<(StatusCode, Json<PostEnvelope>), ApiError> {
///     // user.user_id() is the author
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        authenticate(state, &parts.headers).map(Auth)
    }
}
