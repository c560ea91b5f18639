use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use prodrev::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A migrated SQLite database inside its own temporary directory. The
/// pool applies the same PRAGMAs as production, so foreign keys are
/// enforced. Dropping the value removes the files.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let database_url = dir.path().join(name).to_string_lossy().to_string();
        let pool = establish_connection_pool(&database_url).expect("connection pool");
        let mut conn = pool.get().expect("connection");
        conn.run_pending_migrations(MIGRATIONS).expect("migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
