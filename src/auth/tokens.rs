// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance, verification and revocation.
//!
//! Tokens are HS256 JWTs signed with the server secret. A token is honoured
//! only while its session id (`sid`) is on the subject's allowlist, so
//! logging out removes the session id and the token stops working even
//! though its signature is still valid.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{AuthError, AuthenticatedUser, SessionClaims};
use crate::storage::UserRepository;

/// Signs and verifies session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service for the given HMAC secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a set of claims.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("token signing failed: {e}")))
    }

    /// Check a token's signature and decode its claims.
    ///
    /// Does not consult the allowlist; see [`TokenService::authenticate`].
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }

    /// Issue a token for `user_id` and add its session to the allowlist.
    pub fn issue(&self, users: &UserRepository<'_>, user_id: &str) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            sid: uuid::Uuid::new_v4().to_string(),
        };
        let token = self.sign(&claims)?;
        users.add_session(user_id, &claims.sid)?;

        tracing::info!(user_id = %user_id, session_id = %claims.sid, "Session issued");
        Ok(token)
    }

    /// Resolve a bearer token to the user it was issued to.
    ///
    /// Fails if the signature is wrong, the user is gone, or the session was
    /// revoked.
    pub fn authenticate(
        &self,
        users: &UserRepository<'_>,
        token: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.verify(token)?;
        let user = users.find(&claims.sub)?.ok_or(AuthError::UnknownUser)?;

        if !user.has_session(&claims.sid) {
            tracing::debug!(user_id = %claims.sub, "Rejected revoked session");
            return Err(AuthError::RevokedToken);
        }

        Ok(AuthenticatedUser {
            user,
            session_id: claims.sid,
            token: token.to_string(),
        })
    }

    /// Revoke the caller's current session. Returns whether it was active.
    pub fn revoke(
        &self,
        users: &UserRepository<'_>,
        caller: &AuthenticatedUser,
    ) -> Result<bool, AuthError> {
        let removed = users.remove_session(caller.user_id(), &caller.session_id)?;
        tracing::info!(user_id = %caller.user_id(), session_id = %caller.session_id, "Session revoked");
        Ok(removed)
    }

    /// Revoke every session of `user_id`. Returns how many were revoked.
    pub fn revoke_all(&self, users: &UserRepository<'_>, user_id: &str) -> Result<usize, AuthError> {
        let revoked = users.clear_sessions(user_id)?;
        tracing::info!(user_id = %user_id, revoked, "All sessions revoked");
        Ok(revoked)
    }
}
