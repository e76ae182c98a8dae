//! Test database setup and management
#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Routes `log` output through the test harness. Run with `RUST_LOG=debug`
/// to see it.
fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Fresh in-memory SQLite database with the full schema.
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is held to a single connection.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    init_logger();

    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await?;

    surveyor::db::create_schema(&db).await?;
    Ok(db)
}
