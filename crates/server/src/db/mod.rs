use std::{
    ffi::c_int,
    fs,
    io,
    path::Path,
    sync::Once,
    time::{Duration, Instant},
};

use deadpool_sqlite::{Config, Hook, HookError, Pool, Runtime};
use include_dir::{include_dir, Dir};
use rusqlite::{Connection, OpenFlags, TransactionBehavior};
use rusqlite_migration::{Migrations, SchemaVersion};
use shared::{
    api::error::{Nothing, ServerError},
    other_error,
};
use tracing::{debug, error, info, instrument, span, trace, warn, Level};
mod database_connection;
pub use database_connection::*;

static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

fn sqlite_connection_profiling_callback(query: &str, duration: Duration) {
    trace!(target: "sqlite_profiling", ?duration, query);
}

fn sqlite_connection_trace_callback(query: &str) {
    trace!(target: "sqlite_tracing", query);
}

fn sqlite_log_callback(sqlite_code: c_int, msg: &str) {
    use rusqlite::ffi;
    let err_code = ffi::Error::new(sqlite_code);

    // See https://www.sqlite.org/rescode.html for description of result codes.
    match sqlite_code & 0xff {
        ffi::SQLITE_NOTICE => info!(target: "sqlite", msg, %err_code, "SQLITE NOTICE"),
        ffi::SQLITE_WARNING => warn!(target: "sqlite", msg, %err_code, "SQLITE WARNING"),
        _ => error!(target: "sqlite", msg, %err_code, "SQLITE ERROR"),
    };
}

pub fn get_migrations() -> Result<Migrations<'static>, ServerError<Nothing>> {
    Migrations::from_directory(&MIGRATIONS_DIR)
        .map_err(|e| other_error!("Migrations::from_directory: {:?}", e))
}

#[instrument(skip(conn))]
pub fn configure_new_connection(conn: &mut Connection) -> Result<(), ServerError<Nothing>> {
    run_pragmas(conn)?;

    if cfg!(debug_assertions) {
        conn.trace(Some(sqlite_connection_trace_callback));
    } else {
        // Hook up the profiling callback
        conn.profile(Some(sqlite_connection_profiling_callback));
    }

    Ok(())
}

#[instrument(skip(conn))]
pub fn run_pragmas(conn: &Connection) -> Result<(), ServerError<Nothing>> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    // Needed for the ON DELETE CASCADE from users to their logs and progress
    conn.pragma_update(None, "foreign_keys", "ON")?;
    // Writers wait for each other rather than failing with SQLITE_BUSY
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}

fn schema_version(
    migrations: &Migrations<'static>,
    conn: &Connection,
) -> Result<usize, ServerError<Nothing>> {
    match migrations
        .current_version(conn)
        .map_err(|e| other_error!("Migrations::current_version: {:?}", e))?
    {
        SchemaVersion::Inside(n) => Ok(n.into()),
        SchemaVersion::Outside(n) => Err(other_error!(
            "Schema version {n} is outside of known schema migrations. Manual intervention required"
        )),
        SchemaVersion::NoneSet => Ok(0),
    }
}

/// Brings the schema up to date on an already configured connection. Returns
/// the number of migrations that ran
pub fn migrate(conn: &mut Connection) -> Result<usize, ServerError<Nothing>> {
    let migrations = get_migrations()?;
    let _span = span!(Level::INFO, "Running migrations").entered();

    let initial_version = schema_version(&migrations, conn)?;

    migrations
        .to_latest(conn)
        .map_err(|e| other_error!("Migrations::to_latest: {:?}", e))?;

    let final_version = schema_version(&migrations, conn)?;

    Ok(final_version - initial_version)
}

#[instrument]
pub fn run_migrations(connection_string: &str) -> Result<usize, ServerError<Nothing>> {
    // Configure the log callback before opening the database
    static CONFIG_LOG: Once = Once::new();
    CONFIG_LOG.call_once(|| {
        // SQLite refuses this once any connection has been opened in the process
        if let Err(e) = unsafe { rusqlite::trace::config_log(Some(sqlite_log_callback)) } {
            warn!("Failed to install the sqlite log callback: {e}");
        }
    });

    let open_flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_CREATE;

    let mut conn = Connection::open_with_flags(connection_string, open_flags)?;
    configure_new_connection(&mut conn)?;

    debug!("Checking DB is writable");
    conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;

    let ran = migrate(&mut conn)?;

    close_database(conn)?;

    Ok(ran)
}

/// Creates the connection pool the handlers draw from. Every new connection
/// gets the same pragmas and callbacks as the migration connection
pub fn create_pool(connection_string: &str) -> Result<Pool, anyhow::Error> {
    let pool = Config::new(connection_string)
        .builder(Runtime::Tokio1)?
        .post_create(Hook::async_fn(|object, _| {
            Box::pin(async move {
                object
                    .interact(|conn| configure_new_connection(conn))
                    .await
                    .map_err(|e| HookError::Message(e.to_string()))?
                    .map_err(|e| HookError::Message(e.to_string()))?;
                Ok(())
            })
        }))
        .build()?;

    Ok(pool)
}

/// Removes the database file along with its WAL and shared memory files
#[instrument]
pub fn delete_database(connection_string: &str) -> Result<(), io::Error> {
    for suffix in ["", "-wal", "-shm"] {
        let path = format!("{connection_string}{suffix}");
        match fs::remove_file(Path::new(&path)) {
            Ok(()) => warn!("Deleted {path}"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Runs an optimize on the database. Should be run periodically to keep the
/// database running optimally. It should be very fast if run regularly
#[instrument(skip(conn))]
pub fn optimize_database(conn: &Connection) -> Result<Duration, ServerError<Nothing>> {
    let start = Instant::now();
    conn.pragma_update(None, "analysis_limit", "400")?;
    conn.pragma_update(None, "optimize", "")?;

    Ok(start.elapsed())
}

#[instrument(skip(conn))]
pub fn close_database(conn: Connection) -> Result<(), ServerError<Nothing>> {
    let d1 = optimize_database(&conn)?;
    let d2 = vacuum_database(&conn)?;

    info!(
        "Optimize db took: {:.3}, vacuum took: {:.3}, total: {:.3}",
        d1.as_secs_f32(),
        d2.as_secs_f32(),
        (d1 + d2).as_secs_f32()
    );
    if let Err((_conn, e)) = conn.close() {
        Err(e)?;
    }

    Ok(())
}

// Vacuums the database to free up space and improve fragmentation
#[instrument(skip(conn))]
pub fn vacuum_database(conn: &Connection) -> Result<Duration, ServerError<Nothing>> {
    let start = Instant::now();
    conn.execute("VACUUM", ())?;
    Ok(start.elapsed())
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    run_pragmas(&conn).unwrap();
    migrate(&mut conn).unwrap();
    conn
}
