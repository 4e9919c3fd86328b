pub mod bigint;

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
use indexql_sql::{self as sql, TypedValue};
use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{debug, info};
use url::Url;

/// A read-only store over a SQLite database.
///
/// The connection is opened with `SQLITE_OPEN_READ_ONLY`. Raw SQL is
/// additionally checked with `sqlite3_stmt_readonly` before it runs.
#[derive(Debug)]
pub struct Sqlite {
    location: Location,
    connection: Mutex<RusqliteConnection>,
    schema: Option<Arc<Schema>>,
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Open a SQLite database from a connection URL, `sqlite:<path>` or
    /// `sqlite::memory:`.
    pub fn connect(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| {
            Error::invalid_connection_url(format!("`{url}` is not a valid URL: {e}"))
        })?;

        if parsed.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url}"
            )));
        }

        if parsed.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(parsed.path())
        }
    }

    /// Open an existing database file. The file is never written.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;

        let connection = RusqliteConnection::open_with_flags(&path, flags).map_err(|e| {
            Error::driver(e).context(err!("failed to open `{}` read-only", path.display()))
        })?;

        Self::from_connection(Location::File(path), connection)
    }

    /// An empty, read-only in-memory database.
    pub fn in_memory() -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection =
            RusqliteConnection::open_in_memory_with_flags(flags).map_err(Error::driver)?;

        Self::from_connection(Location::InMemory, connection)
    }

    fn from_connection(location: Location, connection: RusqliteConnection) -> Result<Self> {
        // LIKE matches case-sensitively, the same as PostgreSQL.
        connection
            .pragma_update(None, "case_sensitive_like", true)
            .map_err(Error::driver)?;

        Ok(Self {
            location,
            connection: Mutex::new(connection),
            schema: None,
        })
    }

    /// The URL this store was opened from.
    pub fn url(&self) -> String {
        match &self.location {
            Location::InMemory => "sqlite::memory:".to_string(),
            Location::File(path) => format!("sqlite:{}", path.display()),
        }
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        self.schema
            .as_ref()
            .ok_or_else(|| err!("no schema registered with the sqlite store"))
    }

    fn with_connection<R>(&self, f: impl FnOnce(&RusqliteConnection) -> Result<R>) -> Result<R> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| err!("sqlite connection lock poisoned"))?;
        f(&connection)
    }
}

#[async_trait]
impl Store for Sqlite {
    fn kind(&self) -> Kind {
        Kind::Sqlite
    }

    async fn register_schema(&mut self, schema: Arc<Schema>) -> Result<()> {
        if schema.kind != Kind::Sqlite {
            return Err(Error::unsupported_engine(schema.kind.name()).context(err!(
                "schema translated for {} cannot be registered with sqlite",
                schema.kind
            )));
        }

        info!(url = %self.url(), tables = schema.tables.len(), "registered schema");
        self.schema = Some(schema);
        Ok(())
    }

    async fn select(&self, select: &Select) -> Result<Vec<Row>> {
        let schema = self.schema()?;
        let table = schema.table(select.table);

        let mut params = Vec::<TypedValue>::new();
        let sql_str = sql::Serializer::sqlite(schema)
            .serialize(&sql::Statement::from(select.clone()), &mut params);

        debug!(table = %table.name, sql = %sql_str, params = params.len(), "select");

        let params = params
            .iter()
            .map(Value::encode_typed)
            .collect::<Result<Vec<_>>>()?;

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(&sql_str).map_err(Error::driver)?;
            let mut rows = stmt
                .query(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver)?;

            let mut ret = vec![];

            while let Some(row) = rows.next().map_err(Error::driver)? {
                ret.push(decode_row(table, row)?);
            }

            Ok(ret)
        })
    }

    async fn query(&self, sql: &str, params: &[CoreValue]) -> Result<Rows> {
        debug!(sql = %sql, params = params.len(), "raw query");

        let params = params
            .iter()
            .map(Value::encode)
            .collect::<Result<Vec<_>>>()?;

        self.with_connection(|connection| {
            let mut stmt = connection.prepare(sql).map_err(Error::driver)?;

            if !stmt.readonly() {
                return Err(Error::read_only_violation(sql));
            }

            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let decl_types: Vec<Option<String>> = stmt
                .columns()
                .iter()
                .map(|column| column.decl_type().map(String::from))
                .collect();

            let mut rows = stmt
                .query(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver)?;

            let mut ret = Rows {
                columns: columns.clone(),
                rows: vec![],
            };

            while let Some(row) = rows.next().map_err(Error::driver)? {
                let mut values = Row::with_capacity(columns.len());

                for (index, name) in columns.iter().enumerate() {
                    let value = row.get_ref(index).map_err(Error::driver)?;
                    values.insert(
                        name.clone(),
                        Value::decode_raw(value, decl_types[index].as_deref())?,
                    );
                }

                ret.rows.push(values);
            }

            Ok(ret)
        })
    }
}

fn decode_row(table: &Table, row: &rusqlite::Row<'_>) -> Result<Row> {
    let mut ret = Row::with_capacity(table.columns.len());

    for (index, column) in table.columns.iter().enumerate() {
        let value = row.get_ref(index).map_err(Error::driver)?;
        let value = Value::decode_column(value, column)
            .map_err(|e| e.context(err!("failed to decode `{}.{}`", table.name, column.name)))?;
        ret.insert(column.name.clone(), value);
    }

    Ok(ret)
}
