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
        CreateEventRequest, DeletedCount, Event, EventEnvelope, EventListEnvelope,
        UpdateEventRequest,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/event",
    request_body = CreateEventRequest,
    tag = "Events",
    responses(
        (status = 201, description = "Event created", body = EventEnvelope),
        (status = 400, description = "Invalid body or empty event name"),
        (status = 404, description = "Creating user does not exist")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(mut request): JsonBody<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventEnvelope>), ApiError> {
    request.event_name = validate::content("eventName", &request.event_name)?;
    let event = Event::new(request);

    state.events().create(&event)?;
    tracing::info!(event_id = %event.id, created_by = %event.created_by, "Event created");

    Ok((StatusCode::CREATED, Json(EventEnvelope { event })))
}

#[utoipa::path(
    post,
    path = "/event/event_update/{id}",
    params(("id" = String, Path, description = "Event identifier")),
    request_body = UpdateEventRequest,
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event updated", body = EventEnvelope),
        (status = 400, description = "Invalid body or empty event name"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such event created by the caller")
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    JsonBody(mut request): JsonBody<UpdateEventRequest>,
) -> Result<Json<EventEnvelope>, ApiError> {
    if let Some(name) = request.event_name.take() {
        request.event_name = Some(validate::content("eventName", &name)?);
    }
    let event = state.events().update(&id, &user, request)?;
    Ok(Json(EventEnvelope { event }))
}

#[utoipa::path(
    post,
    path = "/event/{id}/event_rsvp/{event_id}",
    params(
        ("id" = String, Path, description = "Attending user; must be the caller"),
        ("event_id" = String, Path, description = "Event identifier")
    ),
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Attendance toggled", body = EventEnvelope),
        (status = 400, description = "User id does not match the caller"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such event")
    )
)]
pub async fn toggle_rsvp(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<Json<EventEnvelope>, ApiError> {
    if user_id != user.user_id() {
        return Err(ApiError::bad_request("Cannot RSVP on behalf of another user"));
    }

    let (event, attending) = state.events().toggle_rsvp(&event_id, &user_id)?;
    tracing::debug!(event_id = %event.id, user_id = %user_id, attending, "RSVP toggled");
    Ok(Json(EventEnvelope { event }))
}

#[utoipa::path(
    get,
    path = "/event/geteventbyId/{id}",
    params(("id" = String, Path, description = "Event identifier")),
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The event", body = EventEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such event")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Auth(_caller): Auth,
    Path(id): Path<String>,
) -> Result<Json<EventEnvelope>, ApiError> {
    let event = state.events().get(&id)?;
    Ok(Json(EventEnvelope { event }))
}

#[utoipa::path(
    get,
    path = "/event/getallEvent",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All events, oldest first", body = EventListEnvelope),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Auth(_caller): Auth,
) -> Result<Json<EventListEnvelope>, ApiError> {
    let events = state.events().list_all()?;
    Ok(Json(EventListEnvelope { events }))
}

#[utoipa::path(
    delete,
    path = "/event/deleteEventById/{id}",
    params(("id" = String, Path, description = "Event identifier")),
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event deleted", body = EventEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such event created by the caller")
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<EventEnvelope>, ApiError> {
    let event = state.events().delete(&id, &user)?;
    tracing::info!(event_id = %event.id, "Event deleted");
    Ok(Json(EventEnvelope { event }))
}

#[utoipa::path(
    delete,
    path = "/event/deleteAllEvent",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every event deleted", body = DeletedCount),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn delete_all_events(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<DeletedCount>, ApiError> {
    let deleted = state.events().clear()?;
    tracing::info!(user_id = %user.user_id(), deleted, "All events deleted");
    Ok(Json(DeletedCount { deleted }))
}
