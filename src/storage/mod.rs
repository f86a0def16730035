// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users, posts, comments and events using an
//! embedded redb database. Each collection is a table of JSON documents
//! keyed by id; repositories give typed, per-entity access on top.
//!
//! ## Layout
//!
//! ```text
//! social.redb
//!   users        {user_id}    -> User
//!   user_emails  {email}      -> user_id
//!   posts        {post_id}    -> Post
//!   comments     {comment_id} -> Comment
//!   events       {event_id}   -> Event
//! ```
//!
//! ## Consistency
//!
//! - Each mutating repository call is one write transaction
//! - Write transactions are serialized by redb
//! - A failed operation leaves no partial writes behind

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{Document, DocumentDb, StorageError, StorageResult, WriteScope, USER_EMAILS};
pub use ownership::{OwnedResource, OwnershipCheck, OwnershipEnforcer};
pub use repository::{CommentRepository, EventRepository, PostRepository, UserRepository};
