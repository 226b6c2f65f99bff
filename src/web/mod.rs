//! HTTP/JSON API for Leclat.
//!
//! Routes live under `/api`; `/health` and the Swagger UI are mounted
//! beside them by [`WebServer`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
