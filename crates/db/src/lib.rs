//! Ledger access for users, leads and properties.
//!
//! The ledger is a row store keyed by each row's `id` column. [`Ledger`]
//! is the only seam the API depends on; [`MemoryLedger`] backs tests and
//! local development, [`PgLedger`] backs deployments.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;

pub use error::LedgerError;
pub use ledger::{Ledger, Sheet};
pub use memory::MemoryLedger;
pub use postgres::PgLedger;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run embedded migrations against the pool.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
