// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment repository.

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::models::{Comment, Post};
use crate::storage::{DocumentDb, OwnershipCheck, StorageResult};
use crate::votes::{cast_vote, VoteDirection, VoteOutcome};

/// Repository for comment operations.
pub struct CommentRepository<'a> {
    db: &'a DocumentDb,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository.
    pub fn new(db: &'a DocumentDb) -> Self {
        Self { db }
    }

    /// Store a comment. The parent post must exist.
    pub fn create(&self, comment: &Comment) -> StorageResult<()> {
        self.db.write(|scope| {
            scope.fetch::<Post>(&comment.post_id)?;
            scope.insert(comment)
        })
    }

    pub fn get(&self, comment_id: &str) -> StorageResult<Comment> {
        self.db.fetch(comment_id)
    }

    /// Comments of one post, oldest first.
    pub fn list_by_post(&self, post_id: &str) -> StorageResult<Vec<Comment>> {
        let mut comments = self.db.list_where::<Comment>(|c| c.post_id == post_id)?;
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    /// Replace the content of a comment owned by `user`.
    pub fn update_content(
        &self,
        comment_id: &str,
        user: &AuthenticatedUser,
        content: String,
    ) -> StorageResult<Comment> {
        self.db.write(|scope| {
            let mut comment = scope
                .fetch::<Comment>(comment_id)
                .verify_owner(user, &format!("Comment {comment_id}"))?;
            comment.content = content;
            comment.updated_at = Utc::now();
            scope.put(&comment)?;
            Ok(comment)
        })
    }

    /// Delete a comment owned by `user`.
    pub fn delete(&self, comment_id: &str, user: &AuthenticatedUser) -> StorageResult<Comment> {
        self.db.write(|scope| {
            let comment = scope
                .fetch::<Comment>(comment_id)
                .verify_owner(user, &format!("Comment {comment_id}"))?;
            scope.remove::<Comment>(comment_id)?;
            Ok(comment)
        })
    }

    /// Apply an up/down vote toggle.
    pub fn vote(
        &self,
        comment_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> StorageResult<(Comment, VoteOutcome)> {
        cast_vote(self.db, comment_id, user_id, direction)
    }
}
