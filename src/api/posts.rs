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
    auth::Auth,
    error::{ApiError, JsonBody},
    models::{CreatePostRequest, Post, PostEnvelope, PostListEnvelope, UpdatePostRequest},
    state::AppState,
    votes::VoteDirection,
};

#[utoipa::path(
    post,
    path = "/post",
    request_body = CreatePostRequest,
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Post created", body = PostEnvelope),
        (status = 400, description = "Invalid body or empty content"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostEnvelope>), ApiError> {
    let content = validate::content("content", &request.content)?;
    let post = Post::new(user.user_id().to_string(), content, request.image_url);

    state.posts().create(&post)?;
    tracing::info!(post_id = %post.id, user_id = %post.user_id, "Post created");

    Ok((StatusCode::CREATED, Json(PostEnvelope { post })))
}

#[utoipa::path(
    get,
    path = "/post",
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All posts, oldest first", body = PostListEnvelope),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Auth(_caller): Auth,
) -> Result<Json<PostListEnvelope>, ApiError> {
    let posts = state.posts().list_all()?;
    Ok(Json(PostListEnvelope { posts }))
}

#[utoipa::path(
    get,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The post", body = PostEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such post")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Auth(_caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<PostEnvelope>, ApiError> {
    let post = state.posts().get(&id)?;
    Ok(Json(PostEnvelope { post }))
}

#[utoipa::path(
    patch,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post updated", body = PostEnvelope),
        (status = 400, description = "Invalid body or empty content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such post owned by the caller")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdatePostRequest>,
) -> Result<Json<PostEnvelope>, ApiError> {
    let content = validate::content("content", &request.content)?;
    let post = state.posts().update_content(&id, &user, content)?;
    Ok(Json(PostEnvelope { post }))
}

#[utoipa::path(
    delete,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post and its comments deleted", body = PostEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such post owned by the caller")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<PostEnvelope>, ApiError> {
    let (post, comments) = state.posts().delete(&id, &user)?;
    tracing::info!(post_id = %post.id, comments, "Post deleted");
    Ok(Json(PostEnvelope { post }))
}

#[utoipa::path(
    put,
    path = "/post/upvote/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upvote cast, retracted or switched", body = PostEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such post")
    )
)]
pub async fn upvote_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<PostEnvelope>, ApiError> {
    vote(&state, &id, user.user_id(), VoteDirection::Up)
}

#[utoipa::path(
    put,
    path = "/post/downvote/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Downvote cast, retracted or switched", body = PostEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such post")
    )
)]
pub async fn downvote_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<PostEnvelope>, ApiError> {
    vote(&state, &id, user.user_id(), VoteDirection::Down)
}

fn vote(
    state: &AppState,
    id: &str,
    user_id: &str,
    direction: VoteDirection,
) -> Result<Json<PostEnvelope>, ApiError> {
    let (post, _) = state.posts().vote(id, user_id, direction)?;
    Ok(Json(PostEnvelope { post }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comment;
    use crate::test_support::{register, test_state};

    fn caller(state: &AppState, token: &str) -> Auth {
        Auth(state.tokens.authenticate(&state.users(), token).unwrap())
    }

    fn new_post(content: &str) -> JsonBody<CreatePostRequest> {
        JsonBody(CreatePostRequest {
            content: content.to_string(),
            image_url: None,
        })
    }

    #[tokio::test]
    async fn create_post_success() {
        let (state, _temp) = test_state();
        let (user, token) = register(&state, "poster@example.com");

        let (status, Json(body)) = create_post(State(state.clone()), caller(&state, &token), new_post(" hello "))
            .await
            .expect("post creation succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.post.user_id, user.id);
        assert_eq!(body.post.content, "hello");
        assert_eq!(body.post.votes.up_votes().count(), 0);
        assert_eq!(state.posts().get(&body.post.id).unwrap(), body.post);
    }

    #[tokio::test]
    async fn create_post_rejects_empty_content() {
        let (state, _temp) = test_state();
        let (_, token) = register(&state, "empty@example.com");

        let err = create_post(State(state.clone()), caller(&state, &token), new_post("   "))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(state.posts().list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_post_by_other_user_is_not_found() {
        let (state, _temp) = test_state();
        let (_, owner) = register(&state, "owner@example.com");
        let (_, other) = register(&state, "other@example.com");
        let (_, Json(body)) = create_post(State(state.clone()), caller(&state, &owner), new_post("mine"))
            .await
            .unwrap();

        let err = update_post(
            State(state.clone()),
            caller(&state, &other),
            Path(body.post.id.clone()),
            JsonBody(UpdatePostRequest {
                content: "stolen".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(state.posts().get(&body.post.id).unwrap().content, "mine");
    }

    #[tokio::test]
    async fn delete_post_removes_comments() {
        let (state, _temp) = test_state();
        let (user, token) = register(&state, "del@example.com");
        let (_, Json(body)) = create_post(State(state.clone()), caller(&state, &token), new_post("bye"))
            .await
            .unwrap();
        state
            .comments()
            .create(&Comment::new(user.id.clone(), body.post.id.clone(), "c".into()))
            .unwrap();

        delete_post(State(state.clone()), caller(&state, &token), Path(body.post.id.clone()))
            .await
            .unwrap();

        assert!(state.posts().get(&body.post.id).is_err());
        assert!(state.comments().list_by_post(&body.post.id).unwrap().is_empty());

        let again = delete_post(State(state.clone()), caller(&state, &token), Path(body.post.id))
            .await
            .unwrap_err();
        assert_eq!(again.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn votes_toggle_and_switch() {
        let (state, _temp) = test_state();
        let (_, author) = register(&state, "author@example.com");
        let (voter, token) = register(&state, "voter@example.com");
        let (_, Json(body)) = create_post(State(state.clone()), caller(&state, &author), new_post("vote me"))
            .await
            .unwrap();
        let id = body.post.id;

        let Json(up) = upvote_post(State(state.clone()), caller(&state, &token), Path(id.clone()))
            .await
            .unwrap();
        assert_eq!(up.post.votes.up_votes().count(), 1);
        assert!(up.post.votes.up_votes().contains(&voter.id));

        let Json(switched) = downvote_post(State(state.clone()), caller(&state, &token), Path(id.clone()))
            .await
            .unwrap();
        assert_eq!(switched.post.votes.up_votes().count(), 0);
        assert_eq!(switched.post.votes.down_votes().count(), 1);

        let Json(retracted) = downvote_post(State(state.clone()), caller(&state, &token), Path(id.clone()))
            .await
            .unwrap();
        assert_eq!(retracted.post.votes.down_votes().count(), 0);
        assert!(retracted.post.votes.down_votes().users().is_empty());

        let missing = upvote_post(State(state.clone()), caller(&state, &token), Path("ghost".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}
