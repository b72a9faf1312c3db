//! Persistence for the kindergarten calendar: Postgres via sqlx, plus an
//! in-memory backend and mocks for tests.

pub mod backend;
pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

pub use backend::PgBackend;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}
