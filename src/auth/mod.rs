//! Identity store and credential service.
//!
//! - **`users`** - user records and database operations
//! - **`sessions`** - JWT token creation and verification
//! - **`handlers`** - registration, sign-in, and user CRUD endpoints

pub mod handlers;
pub mod sessions;
pub mod users;

pub use users::{UserRecord, UserResponse, UserStore};
