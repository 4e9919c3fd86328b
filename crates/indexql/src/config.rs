use indexql_core::{err, Result};
use indexql_driver_postgresql::PoolConfig;
use indexql_graphql::{Limits, LoaderConfig};

use std::{str::FromStr, time::Duration};

/// Used when neither [`Config::database_url`] nor `DATABASE_URL` is set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:.indexql/indexql.db";

/// Configuration for [`Db`](crate::Db).
#[derive(Debug, Clone)]
pub struct Config {
    /// Selects the engine by scheme: `sqlite:<path>`, `sqlite::memory:` or
    /// `postgresql://...`.
    pub database_url: String,

    /// Connection pool settings. Only the PostgreSQL store pools connections.
    pub pool: PoolConfig,

    /// Query schema settings
    pub graphql: GraphqlConfig,
}

/// Paging bounds and relation batching for the query schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphqlConfig {
    /// Page size of plural fields when `limit` is omitted.
    pub default_limit: u64,

    /// Largest `limit` a plural field accepts.
    pub max_limit: u64,

    /// How long related-row lookups wait to be batched together.
    pub batch_delay: Duration,

    /// Lookups per batched select.
    pub max_batch_size: usize,
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `DATABASE_URL`, `INDEXQL_MAX_CONNECTIONS`,
    /// `INDEXQL_DEFAULT_LIMIT` and `INDEXQL_MAX_LIMIT` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }

        if let Some(max_size) = parse(&lookup, "INDEXQL_MAX_CONNECTIONS")? {
            config.pool = config.pool.max_size(max_size);
        }

        if let Some(default_limit) = parse(&lookup, "INDEXQL_DEFAULT_LIMIT")? {
            config.graphql.default_limit = default_limit;
        }

        if let Some(max_limit) = parse(&lookup, "INDEXQL_MAX_LIMIT")? {
            config.graphql.max_limit = max_limit;
        }

        Ok(config)
    }

    pub fn database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn graphql(mut self, graphql: GraphqlConfig) -> Self {
        self.graphql = graphql;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            pool: PoolConfig::default(),
            graphql: GraphqlConfig::default(),
        }
    }
}

impl GraphqlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_limit(mut self, default_limit: u64) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub fn batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    pub fn max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub(crate) fn limits(&self) -> Limits {
        Limits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }

    pub(crate) fn loader(&self) -> LoaderConfig {
        LoaderConfig {
            batch_delay: self.batch_delay,
            max_batch_size: self.max_batch_size,
        }
    }
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        let limits = Limits::default();
        let loader = LoaderConfig::default();

        Self {
            default_limit: limits.default_limit,
            max_limit: limits.max_limit,
            batch_delay: loader.batch_delay,
            max_batch_size: loader.max_batch_size,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| err!("invalid `{name}` value `{raw}`: {e}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.graphql, GraphqlConfig::default());
        assert_eq!(config.graphql.default_limit, 50);
        assert_eq!(config.graphql.max_limit, 1000);
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/indexer"),
            ("INDEXQL_MAX_CONNECTIONS", "4"),
            ("INDEXQL_DEFAULT_LIMIT", " 10 "),
            ("INDEXQL_MAX_LIMIT", "100"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgresql://localhost/indexer");
        assert_eq!(config.pool.max_size, 4);
        assert_eq!(config.graphql.limits(), Limits { default_limit: 10, max_limit: 100 });
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[("INDEXQL_MAX_LIMIT", "lots")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid `INDEXQL_MAX_LIMIT` value `lots`"));
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new()
            .database_url("sqlite::memory:")
            .graphql(GraphqlConfig::new().batch_delay(Duration::ZERO).max_batch_size(8));

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(
            config.graphql.loader(),
            LoaderConfig {
                batch_delay: Duration::ZERO,
                max_batch_size: 8,
            }
        );
    }
}
