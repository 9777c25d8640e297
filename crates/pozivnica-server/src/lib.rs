//! Static file server for generated invitations.
//!
//! Serves the public directory byte-for-byte, with `index.html` for
//! directories, an `.html` retry for extensionless paths and a plain
//! listing for directories without an index.

pub mod listing;
pub mod server;

pub use server::{router, ServerConfig, ServerError, StaticServer};
