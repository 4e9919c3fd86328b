//! Connection pooling for PostgreSQL clients.

use indexql_core::{Error, Result};
use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};
use tokio_postgres::{Client, Config, NoTls};
use tracing::error;

/// Get the default maximum size of a pool, which is `cpu_core_count * 4`.
fn get_default_pool_max_size() -> usize {
    deadpool::managed::PoolConfig::default().max_size
}

/// Configuration for connection pool behavior.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_size: usize,

    /// How long a request waits for a free connection. `None` waits forever.
    pub wait_timeout: Option<Duration>,
}

impl PoolConfig {
    /// Creates a new pool configuration with default settings.
    pub fn new() -> Self {
        Self {
            max_size: get_default_pool_max_size(),
            wait_timeout: Some(Duration::from_secs(30)),
        }
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn wait_timeout(mut self, wait_timeout: Option<Duration>) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A pool of PostgreSQL clients.
#[derive(Clone)]
pub(crate) struct Pool {
    inner: deadpool::managed::Pool<Manager>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("status", &self.inner.status())
            .finish()
    }
}

impl Pool {
    pub(crate) fn new(config: Config, pool_config: &PoolConfig) -> Result<Self> {
        let timeouts = deadpool::managed::Timeouts {
            wait: pool_config.wait_timeout,
            ..Default::default()
        };

        let inner = deadpool::managed::Pool::builder(Manager { config })
            .runtime(deadpool::Runtime::Tokio1)
            .max_size(pool_config.max_size)
            .timeouts(timeouts)
            .build()
            .map_err(Error::connection_pool)?;

        Ok(Self { inner })
    }

    /// Retrieves a client from the pool.
    pub(crate) async fn get(&self) -> Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(Error::connection_pool)?;
        Ok(PoolConnection { inner: connection })
    }
}

#[derive(Debug)]
struct Manager {
    config: Config,
}

impl deadpool::managed::Manager for Manager {
    type Type = Client;
    type Error = tokio_postgres::Error;

    async fn create(&self) -> std::result::Result<Self::Type, Self::Error> {
        let (client, connection) = self.config.connect(NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "postgresql connection error");
            }
        });

        Ok(client)
    }

    async fn recycle(
        &self,
        client: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        client.batch_execute("").await?;
        Ok(())
    }
}

/// A client retrieved from a pool.
///
/// When dropped, the client is returned to the pool for reuse.
pub(crate) struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
