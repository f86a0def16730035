// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Vote Engine
//!
//! Posts and comments carry a [`VoteState`]: an up tally and a down tally,
//! each holding a count and the set of users behind it.
//!
//! ## Toggle Semantics
//!
//! | Current vote | Request | Result |
//! |--------------|---------|--------|
//! | none | up | up (cast) |
//! | up | up | none (retracted) |
//! | down | up | up (switched) |
//!
//! and symmetrically for down votes. Voting the same direction twice
//! cancels the vote, so repeating a request always returns the entity to
//! the state it had before the first one.
//!
//! ## Invariants
//!
//! - `tally.count == tally.users.len()` for both tallies
//! - a user id is in at most one of the two tallies
//!
//! Both hold after every [`VoteState::apply`]; tally fields are private so
//! nothing else can break them.
//!
//! ## Atomicity
//!
//! [`cast_vote`] performs the read-modify-write inside one document store
//! write transaction, so concurrent votes on the same entity are applied
//! one after another.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{Document, DocumentDb, StorageResult};

/// Direction of a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }
}

impl std::fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteDirection::Up => write!(f, "up"),
            VoteDirection::Down => write!(f, "down"),
        }
    }
}

/// What a vote request did to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote by this user.
    Cast,
    /// Same direction as the existing vote; the vote was removed.
    Retracted,
    /// The user's vote moved from the opposite direction.
    Switched,
}

/// One direction's tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VoteTally {
    /// Number of users in `users`.
    count: u64,
    /// Users who voted in this direction.
    users: BTreeSet<String>,
}

impl VoteTally {
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn users(&self) -> &BTreeSet<String> {
        &self.users
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.contains(user_id)
    }

    fn add(&mut self, user_id: &str) {
        if self.users.insert(user_id.to_string()) {
            self.count += 1;
        }
    }

    fn remove(&mut self, user_id: &str) {
        if self.users.remove(user_id) {
            self.count = self.count.saturating_sub(1);
        }
    }
}

/// Up and down tallies of a votable entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteState {
    up_votes: VoteTally,
    down_votes: VoteTally,
}

impl VoteState {
    pub fn up_votes(&self) -> &VoteTally {
        &self.up_votes
    }

    pub fn down_votes(&self) -> &VoteTally {
        &self.down_votes
    }

    /// The direction `user_id` currently votes in, if any.
    pub fn current_vote(&self, user_id: &str) -> Option<VoteDirection> {
        if self.up_votes.contains(user_id) {
            Some(VoteDirection::Up)
        } else if self.down_votes.contains(user_id) {
            Some(VoteDirection::Down)
        } else {
            None
        }
    }

    /// Apply a vote request with toggle semantics.
    pub fn apply(&mut self, user_id: &str, direction: VoteDirection) -> VoteOutcome {
        match self.current_vote(user_id) {
            Some(current) if current == direction => {
                self.tally_mut(direction).remove(user_id);
                VoteOutcome::Retracted
            }
            Some(current) => {
                self.tally_mut(current).remove(user_id);
                self.tally_mut(direction).add(user_id);
                VoteOutcome::Switched
            }
            None => {
                self.tally_mut(direction).add(user_id);
                VoteOutcome::Cast
            }
        }
    }

    /// Counts match set sizes and no user is in both sets.
    pub fn is_consistent(&self) -> bool {
        let counts_match = self.up_votes.count == self.up_votes.users.len() as u64
            && self.down_votes.count == self.down_votes.users.len() as u64;
        let disjoint = self.up_votes.users.is_disjoint(&self.down_votes.users);
        counts_match && disjoint
    }

    fn tally_mut(&mut self, direction: VoteDirection) -> &mut VoteTally {
        match direction {
            VoteDirection::Up => &mut self.up_votes,
            VoteDirection::Down => &mut self.down_votes,
        }
    }
}

/// Entities that carry a [`VoteState`].
pub trait Votable: Document {
    fn votes(&self) -> &VoteState;
    fn votes_mut(&mut self) -> &mut VoteState;

    /// Stamp the entity as modified now.
    fn touch(&mut self);
}

/// Apply a vote to the stored entity `id` in one write transaction.
///
/// Fails with `StorageError::NotFound` if the entity does not exist.
pub fn cast_vote<D: Votable>(
    db: &DocumentDb,
    id: &str,
    user_id: &str,
    direction: VoteDirection,
) -> StorageResult<(D, VoteOutcome)> {
    let (entity, outcome) = db.update::<D, _>(id, |entity| {
        let outcome = entity.votes_mut().apply(user_id, direction);
        entity.touch();
        Ok(outcome)
    })?;

    debug_assert!(entity.votes().is_consistent());
    tracing::debug!(
        kind = D::KIND,
        id = %id,
        user_id = %user_id,
        %direction,
        ?outcome,
        "Vote applied"
    );

    Ok((entity, outcome))
}
