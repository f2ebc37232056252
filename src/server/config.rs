//! HTTP server configuration object.

use std::net::SocketAddr;

use kerbside::outbound::persistence::pool::DbPool;

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pool: DbPool,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, pool: DbPool) -> Self {
        Self { bind_addr, pool }
    }
}
