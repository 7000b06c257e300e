//! DBO API server binary.
//!
//! Serves the account, user and order API over PostgreSQL, or over
//! in-process tables with `--in-memory`.

use clap::Parser;
use dbo_api::config::ApiConfig;
use dbo_core::auth::jwt::resolve_jwt_secret;
use dbo_core::store::Stores;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "dbo_server", about = "DBO API server")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/dbo"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep all records in process memory instead of PostgreSQL.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,dbo_api=debug,dbo_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let stores = if args.in_memory {
        warn!("using in-memory stores; data is lost on exit");
        Stores::in_memory()
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&args.database_url)
            .await?;

        info!("running database migrations");
        dbo_api::migrate(&pool).await?;
        Stores::postgres(pool)
    };

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        database_url: args.database_url,
        jwt_secret: resolve_jwt_secret(),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = dbo_api::router(dbo_api::AppState::new(stores, config));

    info!(addr = %local_addr, "REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}
