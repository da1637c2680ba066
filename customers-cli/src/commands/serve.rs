//! HTTP server command

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use customers_server::db::{create_pool_with_options, schema};
use customers_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CUSTOMERS_BIND", default_value = "0.0.0.0:9999")]
    pub bind: SocketAddr,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Do not create the customers table on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = create_pool_with_options(&args.database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        schema::migrate(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    run_server(pool, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
