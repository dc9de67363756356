//! Process-wide database handle.
//!
//! The connection is opened lazily on first use and then shared for the
//! process lifetime. Concurrent first callers all await the same pending
//! connect rather than opening duplicates; there is no teardown short of
//! process exit.

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};
use tokio::sync::OnceCell;

use crate::settings;

static CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();

pub async fn connection(config: &settings::Database) -> Result<&'static DatabaseConnection, DbErr> {
    CONNECTION
        .get_or_try_init(|| async {
            let url = match config {
                settings::Database::Memory => "sqlite::memory:".to_string(),
                settings::Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            };
            tracing::info!("connecting to {url}");
            let database = Database::connect(url).await?;
            Migrator::up(&database, None).await?;
            Ok(database)
        })
        .await
}
