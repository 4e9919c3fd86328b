mod numeric;

mod pool;
pub use pool::PoolConfig;
use pool::Pool;

mod registry;
pub use registry::Registry;

mod value;
pub(crate) use value::Value;

use indexql_core::{
    async_trait,
    driver::{Kind, Store},
    err,
    schema::db::{Schema, Table},
    stmt::{Row, Rows, Select, Value as CoreValue},
    Error, Result,
};
use indexql_sql as sql;
use std::sync::Arc;
use tokio_postgres::{types::ToSql, Config, Transaction};
use tracing::{debug, info, warn};
use url::Url;

/// Statement kinds accepted by [`PostgreSQL::query`].
const READ_KEYWORDS: &[&str] = &["SELECT", "WITH", "VALUES", "TABLE", "SHOW", "EXPLAIN"];

/// A read-only store over a pool of PostgreSQL connections.
///
/// Every statement runs inside a `READ ONLY` transaction.
#[derive(Debug)]
pub struct PostgreSQL {
    pool: Pool,
    registry: Registry,
    schema: Option<Arc<Schema>>,
}

impl PostgreSQL {
    /// Creates a store for a `postgresql://` or `postgres://` connection URL.
    ///
    /// Connections are opened lazily, on first use.
    pub fn connect(url: &str, pool_config: &PoolConfig) -> Result<Self> {
        let config = Self::config_from_url(url)?;
        Self::with_config(config, pool_config)
    }

    /// Creates a store from a [`tokio_postgres::Config`].
    pub fn with_config(config: Config, pool_config: &PoolConfig) -> Result<Self> {
        Ok(Self {
            pool: Pool::new(config, pool_config)?,
            registry: Registry::default(),
            schema: None,
        })
    }

    fn config_from_url(url: &str) -> Result<Config> {
        let url = Url::parse(url).map_err(|e| {
            Error::invalid_connection_url(format!("`{url}` is not a valid URL: {e}"))
        })?;

        if !matches!(url.scheme(), "postgresql" | "postgres") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; url={url}"
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url}"))
        })?;

        let dbname = url.path().trim_start_matches('/');

        if dbname.is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(dbname);

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        Ok(config)
    }

    /// Tables registered with this store.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        self.schema
            .as_ref()
            .ok_or_else(|| err!("no schema registered with the postgresql store"))
    }

    /// Checks that every registered table can be read with its translated
    /// column list. Tables that cannot are logged and skipped.
    async fn reflect(&self) -> Result<()> {
        let client = self.pool.get().await?;

        for table in self.registry.tables() {
            let Some(projection) = self.registry.projection(&table.name) else {
                continue;
            };

            let sql = format!(
                "SELECT {projection} FROM \"{}\" LIMIT 0",
                table.name.replace('"', "\"\"")
            );

            // Preparing resolves every column without reading any rows.
            if let Err(e) = client.prepare(&sql).await {
                warn!(table = %table.name, error = %e, "table is not readable");
            }
        }

        Ok(())
    }
}

async fn read_only(client: &mut tokio_postgres::Client) -> Result<Transaction<'_>> {
    client
        .build_transaction()
        .read_only(true)
        .start()
        .await
        .map_err(Error::driver)
}

fn is_read_statement(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    READ_KEYWORDS
        .iter()
        .any(|read| read.eq_ignore_ascii_case(&keyword))
}

fn as_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|param| param as &(dyn ToSql + Sync))
        .collect()
}

#[async_trait]
impl Store for PostgreSQL {
    fn kind(&self) -> Kind {
        Kind::Postgresql
    }

    async fn register_schema(&mut self, schema: Arc<Schema>) -> Result<()> {
        if schema.kind != Kind::Postgresql {
            return Err(Error::unsupported_engine(schema.kind.name()).context(err!(
                "schema translated for {} cannot be registered with postgresql",
                schema.kind
            )));
        }

        self.registry.register(&schema);
        self.schema = Some(schema);

        self.reflect().await?;

        info!(tables = self.registry.len(), "registered schema");
        Ok(())
    }

    async fn select(&self, select: &Select) -> Result<Vec<Row>> {
        let schema = self.schema()?;
        let name = &schema.table(select.table).name;
        let table = self
            .registry
            .describe(name)
            .ok_or_else(|| err!("table `{name}` is not registered"))?;

        // The server reports each parameter's type, so values bind untyped.
        let mut params = Vec::<CoreValue>::new();
        let sql_str = sql::Serializer::postgresql(schema)
            .serialize(&sql::Statement::from(select.clone()), &mut params);

        debug!(table = %table.name, sql = %sql_str, params = params.len(), "select");

        let params: Vec<_> = params.into_iter().map(Value::from).collect();

        let mut client = self.pool.get().await?;
        let tx = read_only(&mut client).await?;
        let rows = tx
            .query(&sql_str, &as_params(&params))
            .await
            .map_err(Error::driver)?;
        tx.commit().await.map_err(Error::driver)?;

        rows.iter().map(|row| decode_row(table, row)).collect()
    }

    async fn query(&self, sql: &str, params: &[CoreValue]) -> Result<Rows> {
        if !is_read_statement(sql) {
            return Err(Error::read_only_violation(sql));
        }

        debug!(sql = %sql, params = params.len(), "raw query");

        let params: Vec<_> = params.iter().cloned().map(Value::from).collect();

        let mut client = self.pool.get().await?;
        let tx = read_only(&mut client).await?;

        let statement = tx.prepare(sql).await.map_err(Error::driver)?;

        // A write smuggled past the keyword check still fails here, inside
        // the read-only transaction.
        let rows = tx
            .query(&statement, &as_params(&params))
            .await
            .map_err(|e| {
                if e.code() == Some(&tokio_postgres::error::SqlState::READ_ONLY_SQL_TRANSACTION) {
                    Error::read_only_violation(sql)
                } else {
                    Error::driver(e)
                }
            })?;
        tx.commit().await.map_err(Error::driver)?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        let mut ret = Rows {
            columns: columns.clone(),
            rows: Vec::with_capacity(rows.len()),
        };

        for row in &rows {
            let mut values = Row::with_capacity(columns.len());

            for (index, name) in columns.iter().enumerate() {
                values.insert(name.clone(), Value::from_sql(row, index)?);
            }

            ret.rows.push(values);
        }

        Ok(ret)
    }
}

fn decode_row(table: &Table, row: &tokio_postgres::Row) -> Result<Row> {
    let mut ret = Row::with_capacity(table.columns.len());

    for (index, column) in table.columns.iter().enumerate() {
        let value = Value::from_sql(row, index)
            .and_then(|value| value.cast(&column.ty))
            .map_err(|e| e.context(err!("failed to decode `{}.{}`", table.name, column.name)))?;
        ret.insert(column.name.clone(), value);
    }

    Ok(ret)
}
