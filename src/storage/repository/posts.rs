// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post repository.

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::models::{Comment, Post};
use crate::storage::{DocumentDb, OwnershipCheck, StorageResult};
use crate::votes::{cast_vote, VoteDirection, VoteOutcome};

/// Repository for post operations.
pub struct PostRepository<'a> {
    db: &'a DocumentDb,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository.
    pub fn new(db: &'a DocumentDb) -> Self {
        Self { db }
    }

    pub fn create(&self, post: &Post) -> StorageResult<()> {
        self.db.insert(post)
    }

    pub fn get(&self, post_id: &str) -> StorageResult<Post> {
        self.db.fetch(post_id)
    }

    /// All posts, oldest first.
    pub fn list_all(&self) -> StorageResult<Vec<Post>> {
        let mut posts = self.db.list_where::<Post>(|_| true)?;
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(posts)
    }

    /// Replace the content of a post owned by `user`.
    pub fn update_content(
        &self,
        post_id: &str,
        user: &AuthenticatedUser,
        content: String,
    ) -> StorageResult<Post> {
        self.db.write(|scope| {
            let mut post = scope
                .fetch::<Post>(post_id)
                .verify_owner(user, &format!("Post {post_id}"))?;
            post.content = content;
            post.updated_at = Utc::now();
            scope.put(&post)?;
            Ok(post)
        })
    }

    /// Delete a post owned by `user` together with its comments.
    ///
    /// Returns the post and the number of comments removed.
    pub fn delete(&self, post_id: &str, user: &AuthenticatedUser) -> StorageResult<(Post, usize)> {
        self.db.write(|scope| {
            let post = scope
                .fetch::<Post>(post_id)
                .verify_owner(user, &format!("Post {post_id}"))?;
            scope.remove::<Post>(post_id)?;
            let comments = scope.remove_where::<Comment>(|c| c.post_id == post_id)?;
            Ok((post, comments))
        })
    }

    /// Apply an up/down vote toggle.
    pub fn vote(
        &self,
        post_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> StorageResult<(Post, VoteOutcome)> {
        cast_vote(self.db, post_id, user_id, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CommentRepository, StorageError};
    use crate::test_support::{authenticated, test_db};

    #[test]
    fn create_get_and_list() {
        let (_temp, db) = test_db();
        let repo = PostRepository::new(&db);

        let first = Post::new("u1".into(), "first".into(), None);
        let second = Post::new("u2".into(), "second".into(), Some("https://img".into()));
        repo.create(&first).unwrap();
        repo.create(&second).unwrap();

        assert_eq!(repo.get(&first.id).unwrap(), first);
        let ids: Vec<String> = repo.list_all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&first.id) && ids.contains(&second.id));
    }

    #[test]
    fn update_requires_owner() {
        let (_temp, db) = test_db();
        let repo = PostRepository::new(&db);
        let post = Post::new("u1".into(), "draft".into(), None);
        repo.create(&post).unwrap();

        let err = repo
            .update_content(&post.id, &authenticated("u2"), "hijack".into())
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));

        let updated = repo
            .update_content(&post.id, &authenticated("u1"), "final".into())
            .unwrap();
        assert_eq!(updated.content, "final");
        assert_eq!(repo.get(&post.id).unwrap().content, "final");
    }

    #[test]
    fn delete_cascades_to_comments() {
        let (_temp, db) = test_db();
        let posts = PostRepository::new(&db);
        let comments = CommentRepository::new(&db);

        let post = Post::new("u1".into(), "p".into(), None);
        let other = Post::new("u1".into(), "q".into(), None);
        posts.create(&post).unwrap();
        posts.create(&other).unwrap();
        comments
            .create(&Comment::new("u2".into(), post.id.clone(), "a".into()))
            .unwrap();
        comments
            .create(&Comment::new("u3".into(), post.id.clone(), "b".into()))
            .unwrap();
        let kept = Comment::new("u2".into(), other.id.clone(), "c".into());
        comments.create(&kept).unwrap();

        let (deleted, removed) = posts.delete(&post.id, &authenticated("u1")).unwrap();
        assert_eq!(deleted.id, post.id);
        assert_eq!(removed, 2);
        assert!(comments.list_by_post(&post.id).unwrap().is_empty());
        assert_eq!(comments.list_by_post(&other.id).unwrap(), vec![kept]);
    }

    #[test]
    fn delete_missing_post_is_not_found() {
        let (_temp, db) = test_db();
        let repo = PostRepository::new(&db);

        let err = repo.delete("nope", &authenticated("u1")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn vote_is_persisted() {
        let (_temp, db) = test_db();
        let repo = PostRepository::new(&db);
        let post = Post::new("u1".into(), "p".into(), None);
        repo.create(&post).unwrap();

        let (voted, outcome) = repo.vote(&post.id, "u9", VoteDirection::Down).unwrap();
        assert_eq!(outcome, VoteOutcome::Cast);
        assert_eq!(voted.votes.down_votes().count(), 1);
        assert_eq!(repo.get(&post.id).unwrap().votes, voted.votes);
    }
}
