// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::{CommentRepository, DocumentDb, EventRepository, PostRepository, UserRepository};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DocumentDb>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: DocumentDb, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.db)
    }

    pub fn posts(&self) -> PostRepository<'_> {
        PostRepository::new(&self.db)
    }

    pub fn comments(&self) -> CommentRepository<'_> {
        CommentRepository::new(&self.db)
    }

    pub fn events(&self) -> EventRepository<'_> {
        EventRepository::new(&self.db)
    }
}
