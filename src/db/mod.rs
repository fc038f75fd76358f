use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};

use crate::config::Settings;
use crate::error::{Error, Result};

pub static MIGRATOR: Migrator = sqlx::migrate!("src/db/migrations");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

enum Slot<T, E> {
    Empty,
    Pending(Shared<BoxFuture<'static, Result<T, E>>>),
    Ready(T),
}

/// Lazily computed value where concurrent callers share one in-flight attempt.
///
/// A failed attempt is handed to every caller awaiting it and then discarded,
/// so the next call starts over.
pub struct SingleFlight<T, E> {
    slot: Mutex<Slot<T, E>>,
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
        }
    }

    pub fn ready(value: T) -> Self {
        Self {
            slot: Mutex::new(Slot::Ready(value)),
        }
    }

    pub fn get(&self) -> Option<T> {
        match &*self.lock() {
            Slot::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let attempt = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Ready(value) => return Ok(value.clone()),
                Slot::Pending(attempt) => attempt.clone(),
                Slot::Empty => {
                    let attempt = init().boxed().shared();
                    *slot = Slot::Pending(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        let mut slot = self.lock();
        let still_current = matches!(&*slot, Slot::Pending(current) if current.ptr_eq(&attempt));
        if still_current {
            *slot = match &result {
                Ok(value) => Slot::Ready(value.clone()),
                Err(_) => Slot::Empty,
            };
        }

        result
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T, E>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the process-wide Postgres pool, connecting on first use.
pub struct ConnectionManager {
    database_url: Option<String>,
    max_connections: u32,
    pool: SingleFlight<PgPool, Arc<sqlx::Error>>,
}

impl ConnectionManager {
    pub fn new(database_url: Option<String>, max_connections: u32) -> Self {
        Self {
            database_url,
            max_connections,
            pool: SingleFlight::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Some(settings.database_url.clone()), settings.max_connections)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            database_url: None,
            max_connections: 0,
            pool: SingleFlight::ready(pool),
        }
    }

    pub async fn connect(&self) -> Result<PgPool> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }

        let database_url = self
            .database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::Configuration("DATABASE_URL must be set".to_string()))?;
        let max_connections = self.max_connections;

        self.pool
            .get_or_try_init(move || async move {
                info!("Connecting to database...");
                match PgPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .connect(&database_url)
                    .await
                {
                    Ok(pool) => {
                        info!("Database connected");
                        Ok(pool)
                    }
                    Err(err) => {
                        error!("Failed to connect to database: {}", err);
                        Err(Arc::new(err))
                    }
                }
            })
            .await
            .map_err(Error::Connection)
    }

    pub async fn migrate(&self) -> Result<()> {
        let pool = self.connect().await?;
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| Error::Internal(anyhow::anyhow!("Failed to run migrations: {}", e)))?;
        info!("Migrations applied");
        Ok(())
    }
}
