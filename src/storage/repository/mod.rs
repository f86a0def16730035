// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for a specific entity type.
//! Operations that check and then modify a document run inside a single
//! write transaction.

pub mod comments;
pub mod events;
pub mod posts;
pub mod users;

pub use comments::CommentRepository;
pub use events::EventRepository;
pub use posts::PostRepository;
pub use users::{normalize_email, UserRepository};
