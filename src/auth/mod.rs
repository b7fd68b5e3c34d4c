//! Session handling with JWT bearer tokens
//!
//! Provides:
//! - JWT token encoding/decoding (`jwt` submodule)
//! - Optional-session middleware (`middleware` submodule)
//! - `AuthUser` extractor (`extractor` submodule)

pub mod extractor;
pub mod jwt;
pub mod middleware;
