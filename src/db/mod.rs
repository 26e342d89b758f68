//! Transactional data access
//!
//! Named connection pools with a commit/rollback/release discipline. Units
//! of work run inside a transaction: committed on success, rolled back and
//! re-thrown on failure, with the connection always returned to the pool.
//! [`DataSources::shutdown`] drains every named pool before the process
//! exits.

use std::collections::HashMap;
use std::future::Future;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

use crate::logger::Logger;

static LOG: Logger = Logger::new("db");

#[derive(Debug, Error)]
pub enum DbError {
    #[error("datasource '{0}' is not initialized")]
    UnknownSource(String),
    #[error("unable to connect: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("transaction failure: {0}")]
    Transaction(#[source] sqlx::Error),
}

/// Map of named connection pools
#[derive(Debug, Default)]
pub struct DataSources {
    pools: HashMap<String, SqlitePool>,
}

impl DataSources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a connection pool and register it under `alias`
    pub async fn register(&mut self, alias: &str, url: &str) -> Result<(), DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| {
                LOG.error(&format!("unable to connect to {url} err: {e}"));
                DbError::Connect(e)
            })?;
        self.pools.insert(alias.to_string(), pool);
        LOG.info(&format!("{alias} pool ready"));
        Ok(())
    }

    #[must_use]
    pub fn has_source(&self, alias: &str) -> bool {
        self.pools.contains_key(alias)
    }

    /// Run a unit of work against the named pool.
    ///
    /// Acquires a connection, opens a transaction and hands it to `work`,
    /// which returns it alongside the result; commits on success, rolls
    /// back and re-throws on failure. Either way the connection goes back
    /// to the pool.
    pub async fn execute<T, F, Fut>(&self, alias: &str, work: F) -> Result<T, DbError>
    where
        F: FnOnce(Transaction<'static, Sqlite>) -> Fut,
        Fut: Future<Output = (Transaction<'static, Sqlite>, Result<T, sqlx::Error>)>,
    {
        let pool = self
            .pools
            .get(alias)
            .ok_or_else(|| DbError::UnknownSource(alias.to_string()))?;

        let tx = pool.begin().await.map_err(DbError::Transaction)?;
        let (tx, outcome) = work(tx).await;
        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(DbError::Transaction)?;
                Ok(value)
            }
            Err(err) => {
                LOG.error(&format!("transaction failed: '{err}' rollback"));
                if let Err(rollback_err) = tx.rollback().await {
                    LOG.error(&format!("rollback failed: {rollback_err}"));
                }
                Err(DbError::Transaction(err))
            }
        }
    }

    /// Close every named pool; called once at shutdown
    pub async fn shutdown(&self) {
        LOG.info("close connection pools");
        for (alias, pool) in &self.pools {
            pool.close().await;
            LOG.info(&format!("{alias} pool closed"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sources_with_file_db(dir: &tempfile::TempDir) -> DataSources {
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("test.db").display()
        );
        let mut sources = DataSources::new();
        sources.register("main", &url).await.unwrap();
        sources
            .execute("main", |mut tx| async move {
                let result = sqlx::query("CREATE TABLE records (id INTEGER PRIMARY KEY, name TEXT)")
                    .execute(&mut *tx)
                    .await
                    .map(|_| ());
                (tx, result)
            })
            .await
            .unwrap();
        sources
    }

    #[tokio::test]
    async fn successful_work_is_committed() {
        let dir = tempfile::tempdir().unwrap();
        let sources = sources_with_file_db(&dir).await;

        sources
            .execute("main", |mut tx| async move {
                let result = sqlx::query("INSERT INTO records (name) VALUES ('alpha')")
                    .execute(&mut *tx)
                    .await
                    .map(|_| ());
                (tx, result)
            })
            .await
            .unwrap();

        let count: i64 = sources
            .execute("main", |mut tx| async move {
                let result = sqlx::query_as("SELECT COUNT(*) FROM records")
                    .fetch_one(&mut *tx)
                    .await
                    .map(|row: (i64,)| row.0);
                (tx, result)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn failed_work_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let sources = sources_with_file_db(&dir).await;

        let result: Result<(), DbError> = sources
            .execute("main", |mut tx| async move {
                let result = match sqlx::query("INSERT INTO records (name) VALUES ('beta')")
                    .execute(&mut *tx)
                    .await
                {
                    Ok(_) => Err(sqlx::Error::RowNotFound),
                    Err(e) => Err(e),
                };
                (tx, result)
            })
            .await;
        assert!(matches!(result, Err(DbError::Transaction(_))));

        let count: i64 = sources
            .execute("main", |mut tx| async move {
                let result = sqlx::query_as("SELECT COUNT(*) FROM records")
                    .fetch_one(&mut *tx)
                    .await
                    .map(|row: (i64,)| row.0);
                (tx, result)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn unknown_alias_is_rejected() {
        let sources = DataSources::new();
        let result: Result<(), DbError> = sources
            .execute("nowhere", |tx| async move { (tx, Ok(())) })
            .await;
        assert!(matches!(result, Err(DbError::UnknownSource(_))));
    }
}
