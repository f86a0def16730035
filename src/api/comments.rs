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
    models::{
        Comment, CommentEnvelope, CommentListEnvelope, CreateCommentRequest, UpdateCommentRequest,
    },
    state::AppState,
    votes::VoteDirection,
};

#[utoipa::path(
    post,
    path = "/comment",
    request_body = CreateCommentRequest,
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Comment created", body = CommentEnvelope),
        (status = 400, description = "Invalid body or empty content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Parent post does not exist")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentEnvelope>), ApiError> {
    let content = validate::content("content", &request.content)?;
    let comment = Comment::new(user.user_id().to_string(), request.post_id, content);

    state.comments().create(&comment)?;
    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "Comment created");

    Ok((StatusCode::CREATED, Json(CommentEnvelope { comment })))
}

#[utoipa::path(
    get,
    path = "/comment/{postId}",
    params(("postId" = String, Path, description = "Identifier of the parent post")),
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comments of the post, oldest first", body = CommentListEnvelope),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Auth(_caller): Auth,
    Path(post_id): Path<String>,
) -> Result<Json<CommentListEnvelope>, ApiError> {
    let comments = state.comments().list_by_post(&post_id)?;
    Ok(Json(CommentListEnvelope { comments }))
}

#[utoipa::path(
    patch,
    path = "/comment/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = UpdateCommentRequest,
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment updated", body = CommentEnvelope),
        (status = 400, description = "Invalid body or empty content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such comment owned by the caller")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateCommentRequest>,
) -> Result<Json<CommentEnvelope>, ApiError> {
    let content = validate::content("content", &request.content)?;
    let comment = state.comments().update_content(&id, &user, content)?;
    Ok(Json(CommentEnvelope { comment }))
}

#[utoipa::path(
    delete,
    path = "/comment/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment deleted", body = CommentEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such comment owned by the caller")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<CommentEnvelope>, ApiError> {
    let comment = state.comments().delete(&id, &user)?;
    tracing::info!(comment_id = %comment.id, "Comment deleted");
    Ok(Json(CommentEnvelope { comment }))
}

#[utoipa::path(
    put,
    path = "/comment/upvote/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upvote cast, retracted or switched", body = CommentEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such comment")
    )
)]
pub async fn upvote_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<CommentEnvelope>, ApiError> {
    let (comment, _) = state.comments().vote(&id, user.user_id(), VoteDirection::Up)?;
    Ok(Json(CommentEnvelope { comment }))
}

#[utoipa::path(
    put,
    path = "/comment/downvote/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Downvote cast, retracted or switched", body = CommentEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such comment")
    )
)]
pub async fn downvote_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<CommentEnvelope>, ApiError> {
    let (comment, _) = state.comments().vote(&id, user.user_id(), VoteDirection::Down)?;
    Ok(Json(CommentEnvelope { comment }))
}
