//! Temporary databases for repository tests.

use std::sync::Arc;

use diesel::RunQueryDsl;
use tempfile::{tempdir, TempDir};

use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};

/// A migrated database in a temp dir. Keep the `TempDir` alive for the test.
pub(crate) fn create_test_db() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    (pool, writer, temp_dir)
}

/// Inserts a login so watchlist and purchase rows satisfy their foreign keys.
pub(crate) fn create_test_user(pool: &Arc<DbPool>, user_id: &str) {
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::sql_query(format!(
        "INSERT INTO users (id, username, password_hash, is_active) \
         VALUES ('{0}', '{0}', 'hash', 1)",
        user_id
    ))
    .execute(&mut conn)
    .expect("Failed to create test user");
}
