//! Database connection bootstrap.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::errors::domain::DomainError;

/// Connect to the database for the given profile.
///
/// SQLite in-memory pools are pinned to a single connection: every pooled
/// connection to `sqlite::memory:` would otherwise get its own empty
/// database.
pub async fn connect_db(profile: DbProfile) -> Result<DatabaseConnection, DomainError> {
    let url = db_url(profile.clone())?;

    let mut opts = ConnectOptions::new(url.clone());
    opts.sqlx_logging(false)
        .connect_timeout(Duration::from_secs(10));
    if url.starts_with("sqlite::memory:") {
        opts.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opts).await.map_err(DomainError::from)?;
    info!(?profile, "database connected");
    Ok(conn)
}
