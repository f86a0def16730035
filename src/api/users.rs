// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::validate;
use crate::{
    auth::{password::hash_password_blocking, Auth},
    error::{ApiError, JsonBody},
    models::{MessageResponse, RegisterUserRequest, UpdateUserRequest, User, UserEnvelope},
    state::AppState,
    storage::repository::normalize_email,
};

fn envelope(user: User) -> Json<UserEnvelope> {
    Json(UserEnvelope { user: user.into() })
}

#[utoipa::path(
    post,
    path = "/user",
    request_body = RegisterUserRequest,
    tag = "Users",
    responses(
        (status = 201, description = "User registered", body = UserEnvelope),
        (status = 400, description = "Invalid body, bad email, short password or email taken")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    validate::email(&request.email)?;
    validate::password(&request.password)?;
    let mut name = request.name;
    name.first_name = validate::content("firstName", &name.first_name)?;

    let password_hash = hash_password_blocking(request.password).await?;
    let mut user = User::new(normalize_email(&request.email), password_hash, name);
    user.phone = request.phone;
    user.info = request.info;

    state.users().create(&user)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, envelope(user)))
}

#[utoipa::path(
    get,
    path = "/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_me(Auth(user): Auth) -> Json<UserEnvelope> {
    envelope(user.user)
}

#[utoipa::path(
    patch,
    path = "/user/me",
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    Auth(user): Auth,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let name = match request.name {
        Some(mut name) => {
            name.first_name = validate::content("firstName", &name.first_name)?;
            Some(name)
        }
        None => None,
    };

    let updated = state.users().update(user.user_id(), |stored| {
        if let Some(name) = name {
            stored.name = name;
        }
        if let Some(phone) = request.phone {
            stored.phone = Some(phone);
        }
        if let Some(info) = request.info {
            stored.info = Some(info);
        }
    })?;

    Ok(envelope(updated))
}

#[utoipa::path(
    delete,
    path = "/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn delete_me(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users().delete(user.user_id())?;
    tracing::info!(user_id = %user.user_id(), "User deleted");
    Ok(Json(MessageResponse::new("Account deleted")))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User identifier")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Auth(_caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    Ok(envelope(state.users().get(&id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{About, PersonName, UserInfo};
    use crate::test_support::{register, test_state};

    fn registration(email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: PersonName {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
            },
            email: email.to_string(),
            password: password.to_string(),
            phone: Some("555-0100".into()),
            info: None,
        }
    }

    async fn caller(state: &AppState, token: &str) -> Auth {
        Auth(state.tokens.authenticate(&state.users(), token).unwrap())
    }

    #[tokio::test]
    async fn register_user_success() {
        let (state, _temp) = test_state();

        let (status, Json(body)) = register_user(
            State(state.clone()),
            JsonBody(registration(" Grace@Example.com", "long-enough")),
        )
        .await
        .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.user.email, "grace@example.com");
        assert_eq!(body.user.phone.as_deref(), Some("555-0100"));

        let stored = state.users().get(&body.user.id).unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(stored.sessions.is_empty());
    }

    #[tokio::test]
    async fn register_user_validation() {
        let (state, _temp) = test_state();

        let short = register_user(State(state.clone()), JsonBody(registration("a@example.com", "short")))
            .await
            .unwrap_err();
        assert_eq!(short.status, StatusCode::BAD_REQUEST);

        let bad_email = register_user(State(state.clone()), JsonBody(registration("nope", "long-enough")))
            .await
            .unwrap_err();
        assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

        register_user(State(state.clone()), JsonBody(registration("dup@example.com", "long-enough")))
            .await
            .unwrap();
        let duplicate = register_user(State(state), JsonBody(registration("DUP@example.com", "long-enough")))
            .await
            .unwrap_err();
        assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_me_changes_only_given_fields() {
        let (state, _temp) = test_state();
        let (user, token) = register(&state, "me@example.com");

        let request = UpdateUserRequest {
            info: Some(UserInfo {
                about: About {
                    designation: Some("Engineer".into()),
                    skills: vec!["rust".into()],
                    ..Default::default()
                },
            }),
            ..Default::default()
        };
        let Json(body) = update_me(State(state.clone()), caller(&state, &token).await, JsonBody(request))
            .await
            .unwrap();

        assert_eq!(body.user.name, user.name);
        let about = body.user.info.unwrap().about;
        assert_eq!(about.designation.as_deref(), Some("Engineer"));
        assert_eq!(about.skills, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn get_user_by_id() {
        let (state, _temp) = test_state();
        let (user, token) = register(&state, "pub@example.com");

        let Json(body) = get_user(State(state.clone()), caller(&state, &token).await, Path(user.id.clone()))
            .await
            .unwrap();
        assert_eq!(body.user.id, user.id);

        let missing = get_user(State(state.clone()), caller(&state, &token).await, Path("ghost".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_me_removes_account_and_sessions() {
        let (state, _temp) = test_state();
        let (user, token) = register(&state, "leaving@example.com");

        delete_me(State(state.clone()), caller(&state, &token).await)
            .await
            .unwrap();

        assert!(state.users().find(&user.id).unwrap().is_none());
        assert!(state.tokens.authenticate(&state.users(), &token).is_err());
    }
}
