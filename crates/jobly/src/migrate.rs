//! Schema migrations via [`refinery`].
//!
//! The `companies` / `jobs` schema ships inside the crate (`migrations/`), so an
//! application only needs a connection to bring a database up to date:
//!
//! ```ignore
//! let pool = jobly::create_pool_with_config(&jobly::DbConfig::from_env()?)?;
//! jobly::migrate::run_pool(&pool).await?;
//! ```

use crate::error::JoblyResult;

pub use refinery::{Report, SchemaVersion};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending migration on a single connection.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = embedded::migrations::runner().run_async(client).await?;
    for m in report.applied_migrations() {
        tracing::info!(version = m.version(), name = m.name(), "migration applied");
    }
    Ok(report)
}

/// Acquire a connection from a pool and run migrations on it.
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}

/// Versions and names of the migrations compiled into this crate.
pub fn embedded_versions() -> Vec<(SchemaVersion, String)> {
    embedded::migrations::runner()
        .get_migrations()
        .iter()
        .map(|m| (m.version(), m.name().to_string()))
        .collect()
}
