//! Huddle - a minimal chat backend.
//!
//! HTTP handlers for creating users, authenticating them, and managing
//! one-to-one and group chat rooms with persisted messages, backed by
//! SQLite through sqlx.
//!
//! # Module Structure
//!
//! - **`server`** - configuration, application state, initialization
//! - **`routes`** - route configuration and router assembly
//! - **`chat`** - chat rooms, membership, messages (the core)
//! - **`auth`** - identity store, password hashing, session tokens
//! - **`db`** - pool setup, storage deadlines, parse helpers
//! - **`error`** - error taxonomy and response conversion
//! - **`response`** - the uniform `{status, message, data}` envelope
//!
//! # Consistency
//!
//! The one genuine invariant in the system - at most one direct chat per
//! unordered user pair - is enforced at the storage boundary by a unique
//! index, not by application locks. See [`chat::repo`] and
//! [`chat::service`].

/// Identity store and session tokens
pub mod auth;

/// Chat rooms, membership, and messages
pub mod chat;

/// Database pool and storage helpers
pub mod db;

/// Error taxonomy
pub mod error;

/// Uniform response envelope
pub mod response;

/// Route configuration
pub mod routes;

/// Server setup and state
pub mod server;
