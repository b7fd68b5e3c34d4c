//! HTTP API for the library

pub mod handlers;
pub mod library_handlers;
pub mod routes;

pub use routes::create_router;
