use std::{str::FromStr, sync::Arc};

use log::debug;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, Executor, SqliteConnection};
use tokio::sync::{Mutex, MutexGuard};

use crate::{schema::CREATE_TABLES, Result};

const SETUP_QUERY: &str = "PRAGMA foreign_keys = ON;
PRAGMA cache_size = -1000;
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;";

#[derive(Clone)]
pub struct Connection {
    inner: Arc<Mutex<SqliteConnection>>,
}

impl Connection {
    /// Opens `database_url`, creating the file if needed, and makes sure the
    /// tables exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let mut connection = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .connect()
            .await?;

        debug!("Running connection setup");
        connection.execute(SETUP_QUERY).await?;
        connection.execute(CREATE_TABLES).await?;

        Ok(Self {
            inner: Arc::new(Mutex::new(connection)),
        })
    }

    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    pub async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.inner.lock().await
    }
}
