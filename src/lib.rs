// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Social Server - Social Networking Backend
//!
//! REST service for users, posts, comments and events, with bearer-token
//! sessions and per-user vote toggling, backed by an embedded redb
//! document store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and OpenAPI document
//! - `auth` - Session tokens, password hashing and the auth middleware
//! - `config` - Environment configuration
//! - `storage` - Document store and per-entity repositories
//! - `votes` - Up/down vote toggling shared by posts and comments

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod votes;

#[cfg(test)]
pub(crate) mod test_support;
