use crate::config::Settings;
use anyhow::{anyhow, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Applied to every connection the pool opens.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_connection_pool(settings: &Settings) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(&settings.database_url);
    let pool = r2d2::Pool::builder()
        .max_size(settings.pool_size)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(manager)
        .map_err(|e| anyhow!("Failed to create pool for {}: {}", settings.database_url, e))?;
    Ok(pool)
}

/// Runs every embedded migration not yet applied, returning the applied versions.
pub fn run_migrations(pool: &DbPool) -> Result<Vec<String>> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
    Ok(applied.iter().map(|version| version.to_string()).collect())
}

#[cfg(test)]
pub fn create_test_pool() -> (tempfile::TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("must create temp dir");
    let settings = Settings {
        database_url: dir.path().join("test.db").to_string_lossy().into_owned(),
        bind_address: "127.0.0.1:0".to_owned(),
        pool_size: 4,
    };
    let pool = create_connection_pool(&settings).expect("must create pool");
    run_migrations(&pool).expect("must migrate");
    (dir, pool)
}
