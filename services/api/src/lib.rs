//! API service: content listings, owner-scoped CRUD, uploads and search
//!
//! The binary in `main.rs` wires these modules to Postgres, S3 and the
//! auth service's public key.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod search_source;
pub mod state;
pub mod upload;
