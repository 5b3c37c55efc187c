//! Database layer for campus-cms.

pub mod entities;
pub mod migrations;
pub mod repositories;
#[cfg(feature = "test-utils")]
pub mod test_utils;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use campus_common::{AppError, AppResult, Config};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Boxed future returned by unit-of-work closures.
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'c>>;

/// Run a closure of database operations as one atomic unit.
///
/// Commits when the closure returns `Ok`, rolls back when it returns `Err`.
/// Every multi-row write flow goes through here; no caller owns its own
/// begin/commit pair.
pub async fn in_transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, T> + Send,
    T: Send,
{
    let txn = db
        .begin()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    match f(&txn).await {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_in_transaction_returns_closure_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = in_transaction(&db, |_txn| Box::pin(async move { Ok(42) })).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_in_transaction_propagates_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result: AppResult<()> = in_transaction(&db, |_txn| {
            Box::pin(async move { Err(AppError::BadRequest("nope".into())) })
        })
        .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
