use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use server::{cli::Cli, db, routes, session_store::SqliteSessionStore, AppState};
use shared::{configure_tracing, load_dotenv};
use tokio::net::TcpListener;
use tower_sessions::ExpiredDeletion;
use tracing::{debug, error, info, warn};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing()?;

    let args = Cli::parse();
    debug!(?args);

    if args.debug_delete_database {
        warn!("Deleting database {}", args.sqlite_connection_string);
        db::delete_database(&args.sqlite_connection_string)?;
    }

    // Run the migrations synchronously before creating the pool or launching the server
    let ran = db::run_migrations(&args.sqlite_connection_string)?;
    info!("Ran {ran} db migrations");

    // Create a database pool to add into the app state
    let pool = db::create_pool(&args.sqlite_connection_string)?;

    // Expired sessions are never loaded but they still take up space
    let session_store = SqliteSessionStore::new(pool.clone());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = session_store.delete_expired().await {
                error!("Failed to delete expired sessions: {e}");
            }
        }
    });

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);

    let listener = TcpListener::bind(socket).await?;
    info!("listening on {}", listener.local_addr()?);

    let state = AppState::new(pool, args);

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
