use chrono::Local;
use std::sync::Arc;

use stockdash_core::db::{self, DbPool};

/// Creates an isolated on-disk database under ./tests/output/ and returns a
/// migrated pool for it. Each test gets its own directory.
pub fn setup_test_db(test_id: &str) -> Arc<DbPool> {
    let now = Local::now();
    let data_dir = now
        .format(&format!("./tests/output/%Y%m%d/%H%M%S%.3f-{}/", test_id))
        .to_string();

    let db_path = db::init(&data_dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    pool
}
