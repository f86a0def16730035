// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{
        About, Comment, CommentEnvelope, CommentListEnvelope, CreateCommentRequest,
        CreateEventRequest, CreatePostRequest, DeletedCount, Education, Event, EventEnvelope,
        EventListEnvelope, LoginRequest, LoginResponse, MessageResponse, PersonName, Post,
        PostEnvelope, PostListEnvelope, RegisterUserRequest, UpdateCommentRequest,
        UpdateEventRequest, UpdatePostRequest, UpdateUserRequest, UserEnvelope, UserInfo,
        UserResponse,
    },
    state::AppState,
    votes::{VoteState, VoteTally},
};

pub mod auth;
pub mod comments;
pub mod events;
pub mod health;
pub mod posts;
pub mod users;
pub mod validate;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/auth/login", post(auth::login))
        .route("/user", post(users::register_user))
        .route("/event", post(events::create_event));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/logout-all", post(auth::logout_all))
        .route(
            "/user/me",
            get(users::get_me)
                .patch(users::update_me)
                .delete(users::delete_me),
        )
        .route("/user/{id}", get(users::get_user))
        .route("/post", get(posts::list_posts).post(posts::create_post))
        .route(
            "/post/{id}",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/post/upvote/{id}", put(posts::upvote_post))
        .route("/post/downvote/{id}", put(posts::downvote_post))
        .route("/comment", post(comments::create_comment))
        .route(
            "/comment/{id}",
            get(comments::list_comments)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/comment/upvote/{id}", put(comments::upvote_comment))
        .route("/comment/downvote/{id}", put(comments::downvote_comment))
        .route("/event/event_update/{id}", post(events::update_event))
        .route(
            "/event/{id}/event_rsvp/{event_id}",
            post(events::toggle_rsvp),
        )
        .route("/event/geteventbyId/{id}", get(events::get_event))
        .route("/event/getallEvent", get(events::list_events))
        .route("/event/deleteEventById/{id}", delete(events::delete_event))
        .route("/event/deleteAllEvent", delete(events::delete_all_events))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social Server API",
        description = "Users, posts, comments, events and votes."
    ),
    paths(
        health::health,
        health::liveness,
        health::readiness,
        auth::login,
        auth::logout,
        auth::logout_all,
        users::register_user,
        users::get_me,
        users::update_me,
        users::delete_me,
        users::get_user,
        posts::create_post,
        posts::list_posts,
        posts::get_post,
        posts::update_post,
        posts::delete_post,
        posts::upvote_post,
        posts::downvote_post,
        comments::create_comment,
        comments::list_comments,
        comments::update_comment,
        comments::delete_comment,
        comments::upvote_comment,
        comments::downvote_comment,
        events::create_event,
        events::update_event,
        events::toggle_rsvp,
        events::get_event,
        events::list_events,
        events::delete_event,
        events::delete_all_events
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            PersonName,
            Education,
            About,
            UserInfo,
            UserResponse,
            UserEnvelope,
            RegisterUserRequest,
            UpdateUserRequest,
            VoteTally,
            VoteState,
            Post,
            PostEnvelope,
            PostListEnvelope,
            CreatePostRequest,
            UpdatePostRequest,
            Comment,
            CommentEnvelope,
            CommentListEnvelope,
            CreateCommentRequest,
            UpdateCommentRequest,
            Event,
            EventEnvelope,
            EventListEnvelope,
            CreateEventRequest,
            UpdateEventRequest,
            DeletedCount
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Login and session revocation"),
        (name = "Users", description = "Registration and profiles"),
        (name = "Posts", description = "Posts and post votes"),
        (name = "Comments", description = "Comments and comment votes"),
        (name = "Events", description = "Events and RSVPs")
    )
)]
struct ApiDoc;
