// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Event repository.

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::models::{Event, UpdateEventRequest, User};
use crate::storage::{DocumentDb, OwnershipCheck, StorageResult};

/// Repository for event operations.
pub struct EventRepository<'a> {
    db: &'a DocumentDb,
}

impl<'a> EventRepository<'a> {
    /// Create a new EventRepository.
    pub fn new(db: &'a DocumentDb) -> Self {
        Self { db }
    }

    /// Store an event. The creating user must exist.
    pub fn create(&self, event: &Event) -> StorageResult<()> {
        self.db.write(|scope| {
            scope.fetch::<User>(&event.created_by)?;
            scope.insert(event)
        })
    }

    pub fn get(&self, event_id: &str) -> StorageResult<Event> {
        self.db.fetch(event_id)
    }

    /// All events, oldest first.
    pub fn list_all(&self) -> StorageResult<Vec<Event>> {
        let mut events = self.db.list_where::<Event>(|_| true)?;
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(events)
    }

    /// Apply the present fields of `changes` to an event owned by `user`.
    pub fn update(
        &self,
        event_id: &str,
        user: &AuthenticatedUser,
        changes: UpdateEventRequest,
    ) -> StorageResult<Event> {
        self.db.write(|scope| {
            let mut event = scope
                .fetch::<Event>(event_id)
                .verify_owner(user, &format!("Event {event_id}"))?;
            if let Some(name) = changes.event_name {
                event.event_name = name;
            }
            if let Some(description) = changes.description {
                event.description = description;
            }
            if let Some(location) = changes.location {
                event.location = Some(location);
            }
            if let Some(starts_at) = changes.starts_at {
                event.starts_at = Some(starts_at);
            }
            if let Some(is_online) = changes.is_online {
                event.is_online = is_online;
            }
            event.updated_at = Utc::now();
            scope.put(&event)?;
            Ok(event)
        })
    }

    /// Delete an event owned by `user`.
    pub fn delete(&self, event_id: &str, user: &AuthenticatedUser) -> StorageResult<Event> {
        self.db.write(|scope| {
            let event = scope
                .fetch::<Event>(event_id)
                .verify_owner(user, &format!("Event {event_id}"))?;
            scope.remove::<Event>(event_id)?;
            Ok(event)
        })
    }

    /// Delete every event. Returns how many were removed.
    pub fn clear(&self) -> StorageResult<usize> {
        self.db.clear::<Event>()
    }

    /// Toggle `user_id`'s attendance. Returns the event and whether the user
    /// is attending afterwards.
    pub fn toggle_rsvp(&self, event_id: &str, user_id: &str) -> StorageResult<(Event, bool)> {
        self.db
            .update::<Event, _>(event_id, |event| Ok(event.toggle_rsvp(user_id)))
    }
}
