//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Resolve the authenticated principal from the identity-provider header.
//! - Inject shared application state (`AppState`) into handlers.
//! - Run every stored credential through the optional-secret adapter on the
//!   way in and on the way out.

pub mod auth;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;
