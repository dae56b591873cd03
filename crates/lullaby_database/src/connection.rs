//! Database connection utilities.

use crate::DatabaseResult;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use lullaby_error::{DatabaseError, DatabaseErrorKind};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MAX_ATTEMPTS: u64 = 3;
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Open the story database at `path`, creating it if needed.
///
/// Enables WAL journaling and a busy timeout, then runs pending migrations.
/// If SQLite reports the file as locked, retries up to three times with a
/// linearly growing delay.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The database cannot be opened, or stays locked through every attempt
/// - A migration fails
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn establish_connection(path: impl AsRef<Path>) -> DatabaseResult<SqliteConnection> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Connection(format!(
                "Cannot create directory {}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let url = path.to_string_lossy();
    let mut attempt = 1;
    loop {
        match open(&url) {
            Ok(conn) => {
                info!("Story database ready");
                return Ok(conn);
            }
            Err(e) if e.is_locked() && attempt < MAX_ATTEMPTS => {
                warn!(attempt, error = %e, "Database locked, retrying");
                std::thread::sleep(Duration::from_millis(100 * attempt));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn open(url: &str) -> DatabaseResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(url)?;
    // Busy timeout first so switching to WAL also waits on other writers.
    conn.batch_execute(&format!(
        "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
        BUSY_TIMEOUT_MS
    ))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    debug!(count = applied.len(), "Applied pending migrations");

    Ok(conn)
}
