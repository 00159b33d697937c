//! Route configuration.

/// Chat route configuration
pub mod chat_routes;

/// User route configuration
pub mod user_routes;

/// Router assembly
pub mod router;

pub use router::create_router;
