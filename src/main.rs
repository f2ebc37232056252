//! Marketplace entry-point: migrations, optional seeding, HTTP server.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use kerbside::inbound::http::health::HealthState;
use kerbside::outbound::persistence::bootstrap::{run_migrations, seed_demo_accounts};
use kerbside::outbound::persistence::pool::{DbPool, PoolConfig};
use server::ServerConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "kerbside.db".into());
    let bind_addr: SocketAddr = env::var("KERBSIDE_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&database_url)).map_err(std::io::Error::other)?;
    run_migrations(&pool).await.map_err(std::io::Error::other)?;

    if env::var("KERBSIDE_SEED_DEMO").ok().as_deref() == Some("1") {
        seed_demo_accounts(&pool)
            .await
            .map_err(std::io::Error::other)?;
    }

    let health_state = web::Data::new(HealthState::new());
    let srv = server::create_server(
        ServerConfig::new(bind_addr, pool),
        health_state.clone(),
    )?;

    health_state.mark_ready();
    info!(%bind_addr, database = %database_url, "marketplace server started");
    srv.await
}
