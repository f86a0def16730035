// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    auth::{password::verify_login_blocking, Auth},
    error::{ApiError, JsonBody},
    models::{LoginRequest, LoginResponse, MessageResponse},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state.users().find_by_email(&request.email)?;
    let stored_hash = account.as_ref().map(|user| user.password_hash.clone());
    let valid = verify_login_blocking(request.password, stored_hash).await?;

    let user = match account {
        Some(user) if valid => user,
        Some(user) => {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            tracing::warn!("Login rejected: unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state.tokens.issue(&state.users(), &user.id)?;
    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    state.tokens.revoke(&state.users(), &user)?;
    Ok(Json(MessageResponse::new("Logged out")))
}

#[utoipa::path(
    post,
    path = "/auth/logout-all",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every session of the caller revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn logout_all(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    let revoked = state.tokens.revoke_all(&state.users(), user.user_id())?;
    Ok(Json(MessageResponse::new(format!(
        "Logged out of {revoked} session(s)"
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{register, test_state, TEST_PASSWORD};
    use axum::http::StatusCode;

    fn credentials(email: &str, password: &str) -> JsonBody<LoginRequest> {
        JsonBody(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn login_issues_working_token() {
        let (state, _temp) = test_state();
        let (user, _) = register(&state, "login@example.com");

        let Json(response) = login(State(state.clone()), credentials("LOGIN@example.com", TEST_PASSWORD))
            .await
            .expect("login succeeds");

        let caller = state
            .tokens
            .authenticate(&state.users(), &response.token)
            .unwrap();
        assert_eq!(caller.user_id(), user.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let (state, _temp) = test_state();
        register(&state, "who@example.com");

        let err = login(State(state.clone()), credentials("who@example.com", "wrong-password"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, INVALID_CREDENTIALS);

        let unknown = login(State(state), credentials("nobody@example.com", TEST_PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(unknown.status, err.status);
        assert_eq!(unknown.message, err.message);
    }

    #[tokio::test]
    async fn logout_revokes_only_current_session() {
        let (state, _temp) = test_state();
        let (_, first) = register(&state, "two@example.com");
        let Json(second) = login(State(state.clone()), credentials("two@example.com", TEST_PASSWORD))
            .await
            .unwrap();

        let caller = state.tokens.authenticate(&state.users(), &first).unwrap();
        logout(State(state.clone()), Auth(caller)).await.unwrap();

        assert!(state.tokens.authenticate(&state.users(), &first).is_err());
        assert!(state
            .tokens
            .authenticate(&state.users(), &second.token)
            .is_ok());
    }

    #[tokio::test]
    async fn logout_all_revokes_everything() {
        let (state, _temp) = test_state();
        let (_, first) = register(&state, "all@example.com");
        let Json(second) = login(State(state.clone()), credentials("all@example.com", TEST_PASSWORD))
            .await
            .unwrap();

        let caller = state.tokens.authenticate(&state.users(), &second.token).unwrap();
        let Json(message) = logout_all(State(state.clone()), Auth(caller)).await.unwrap();

        assert_eq!(message.message, "Logged out of 2 session(s)");
        assert!(state.tokens.authenticate(&state.users(), &first).is_err());
        assert!(state.tokens.authenticate(&state.users(), &second.token).is_err());
    }
}
