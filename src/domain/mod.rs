//! Domain aggregates exposed by the marketplace service layer.

pub mod filter;
pub mod listing;
pub mod types;
pub mod user;
