//! Database models shared across the marketplace repository.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod listing;
pub mod user;
