//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 secret shared with the identity provider; also keys the session
    /// cookie, so it must be at least 64 bytes long.
    pub secret: String,
    /// Directory where uploaded images are stored.
    pub upload_dir: String,
    /// Externally visible base URL, used to build image URLs.
    pub public_url: String,
    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,
}

fn default_pool_size() -> u32 {
    8
}
