//! REST API server for the EduTrack enrollment service.
//!
//! Provides HTTP endpoints for the user, course, and enrollment rule sets,
//! request routing, and the hyper server loop.

pub mod handlers;
pub mod router;
pub mod server;

pub use router::{AppState, Router, RouterError};
pub use server::Server;
