// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Stored documents and the request/response shapes of the REST API. All
//! types serialize as camelCase JSON and derive `ToSchema` for the OpenAPI
//! document.
//!
//! ## Model Categories
//!
//! - **Users**: identity, profile and the session allowlist
//! - **Posts / Comments**: owned content carrying a [`VoteState`]
//! - **Events**: owned content carrying an RSVP set
//!
//! Stored records never leave the service as-is when they hold secrets:
//! [`User`] is exposed through [`UserResponse`], which omits the password
//! hash and the session allowlist.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{Document, OwnedResource};
use crate::votes::{Votable, VoteState};

/// Collections created when the document store is opened.
pub const COLLECTIONS: [&str; 4] = [
    User::COLLECTION,
    Post::COLLECTION,
    Comment::COLLECTION,
    Event::COLLECTION,
];

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// User Models
// =============================================================================

/// A user's display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// One education entry of a profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub school_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// Free-form "about" section of a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct About {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Optional profile information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserInfo {
    #[serde(default)]
    pub about: About,
}

/// A registered user as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Normalized (trimmed, lower-case) email; unique.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub name: PersonName,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub info: Option<UserInfo>,
    /// Allowlist of active session ids. A token is honoured only while its
    /// session id is listed here.
    #[serde(default)]
    pub sessions: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String, name: PersonName) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            email,
            password_hash,
            name,
            phone: None,
            info: None,
            sessions: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions.contains(session_id)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

/// User as returned by the API (no password hash, no sessions).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: PersonName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<UserInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            info: user.info,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: PersonName,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub info: Option<UserInfo>,
}

/// Request to update the caller's profile. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<PersonName>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub info: Option<UserInfo>,
}

/// Envelope for a single user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token issued by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Plain acknowledgement message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Post Models
// =============================================================================

/// A post as stored in the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    /// Author of the post.
    pub user_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub votes: VoteState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_id: String, content: String, image_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id,
            content,
            image_url,
            votes: VoteState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Post {
    const COLLECTION: &'static str = "posts";
    const KIND: &'static str = "Post";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedResource for Post {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

impl Votable for Post {
    fn votes(&self) -> &VoteState {
        &self.votes
    }

    fn votes_mut(&mut self) -> &mut VoteState {
        &mut self.votes
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Request to change a post's content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub content: String,
}

/// Envelope for a single post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostEnvelope {
    pub post: Post,
}

/// Envelope for a list of posts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostListEnvelope {
    pub posts: Vec<Post>,
}

// =============================================================================
// Comment Models
// =============================================================================

/// A comment as stored in the `comments` collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    /// Author of the comment.
    pub user_id: String,
    /// Post the comment belongs to.
    pub post_id: String,
    pub content: String,
    #[serde(default)]
    pub votes: VoteState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: String, post_id: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id,
            post_id,
            content,
            votes: VoteState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Comment {
    const COLLECTION: &'static str = "comments";
    const KIND: &'static str = "Comment";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedResource for Comment {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

impl Votable for Comment {
    fn votes(&self) -> &VoteState {
        &self.votes
    }

    fn votes_mut(&mut self) -> &mut VoteState {
        &mut self.votes
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Request to create a comment. The author is the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: String,
}

/// Request to change a comment's content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Envelope for a single comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentEnvelope {
    pub comment: Comment,
}

/// Envelope for a list of comments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentListEnvelope {
    pub comments: Vec<Comment>,
}

// =============================================================================
// Event Models
// =============================================================================

/// An event as stored in the `events` collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// User who created the event.
    pub created_by: String,
    pub event_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_online: bool,
    /// Users attending the event.
    #[serde(default)]
    pub rsvp: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(request: CreateEventRequest) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            created_by: request.created_by,
            event_name: request.event_name,
            description: request.description,
            location: request.location,
            starts_at: request.starts_at,
            is_online: request.is_online,
            rsvp: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add `user_id` to the RSVP list, or remove it if already present.
    ///
    /// Returns whether the user is attending afterwards.
    pub fn toggle_rsvp(&mut self, user_id: &str) -> bool {
        self.updated_at = Utc::now();
        if self.rsvp.remove(user_id) {
            false
        } else {
            self.rsvp.insert(user_id.to_string());
            true
        }
    }
}

impl Document for Event {
    const COLLECTION: &'static str = "events";
    const KIND: &'static str = "Event";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedResource for Event {
    fn owner_user_id(&self) -> &str {
        &self.created_by
    }
}

/// Request to create an event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Id of the creating user; must exist.
    pub created_by: String,
    pub event_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_online: bool,
}

/// Request to update an event. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_online: Option<bool>,
}

/// Envelope for a single event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventEnvelope {
    pub event: Event,
}

/// Envelope for a list of events.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventListEnvelope {
    pub events: Vec<Event>,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedCount {
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::votes::VoteDirection;

    #[test]
    fn new_comment_starts_with_empty_votes() {
        let comment = Comment::new("u1".into(), "p1".into(), "x".into());
        assert!(!comment.id.is_empty());
        assert_eq!(comment.votes.up_votes().count(), 0);
        assert_eq!(comment.votes.down_votes().count(), 0);
    }

    #[test]
    fn comment_serializes_camel_case() {
        let mut comment = Comment::new("u1".into(), "p1".into(), "x".into());
        comment.votes.apply("u2", VoteDirection::Down);

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["postId"], "p1");
        assert_eq!(json["votes"]["downVotes"]["count"], 1);
        assert_eq!(json["votes"]["downVotes"]["users"][0], "u2");
    }

    #[test]
    fn user_response_hides_secrets() {
        let mut user = User::new(
            "a@example.com".into(),
            "$argon2id$secret".into(),
            PersonName {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            },
        );
        user.sessions.insert("sess-1".into());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("sessions").is_none());
        assert_eq!(json["name"]["firstName"], "Ada");
    }

    #[test]
    fn rsvp_toggles_membership() {
        let mut event = Event::new(CreateEventRequest {
            created_by: "u1".into(),
            event_name: "Meetup".into(),
            description: String::new(),
            location: None,
            starts_at: None,
            is_online: true,
        });

        assert!(event.toggle_rsvp("u2"));
        assert!(event.rsvp.contains("u2"));
        assert!(!event.toggle_rsvp("u2"));
        assert!(event.rsvp.is_empty());
    }
}
