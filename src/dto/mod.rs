//! DTO modules that bridge services with the JSON API and its clients.

pub mod api;
