mod capability;
pub use capability::{Capability, StorageTypes};

use crate::{
    async_trait,
    schema::db::Schema,
    stmt::{Row, Rows, Select, Value},
    Error, Result,
};

use std::{fmt, sync::Arc};

/// The storage engines a schema can be translated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Embedded single-file engine.
    Sqlite,

    /// Client/server engine.
    Postgresql,
}

impl Kind {
    /// Selects the engine from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Kind> {
        let Some((scheme, _)) = url.split_once(':') else {
            return Err(Error::invalid_connection_url(format!(
                "`{url}` has no scheme"
            )));
        };

        match scheme {
            "sqlite" => Ok(Kind::Sqlite),
            "postgresql" | "postgres" => Ok(Kind::Postgresql),
            scheme => Err(Error::unsupported_engine(scheme)),
        }
    }

    pub fn capability(self) -> &'static Capability {
        match self {
            Kind::Sqlite => &Capability::SQLITE,
            Kind::Postgresql => &Capability::POSTGRESQL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Sqlite => "sqlite",
            Kind::Postgresql => "postgresql",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only access to a storage engine.
#[async_trait]
pub trait Store: fmt::Debug + Send + Sync + 'static {
    /// The engine behind this store.
    fn kind(&self) -> Kind;

    /// Register the translated schema with the store. Called once, before the
    /// store is shared.
    async fn register_schema(&mut self, schema: Arc<Schema>) -> Result<()>;

    /// Execute a typed read. Values are decoded per the registered column
    /// definitions.
    async fn select(&self, select: &Select) -> Result<Vec<Row>>;

    /// Execute raw SQL. Anything that could mutate the database is rejected
    /// with a read-only violation.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Rows>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_url() {
        assert_eq!(Kind::from_url("sqlite::memory:").unwrap(), Kind::Sqlite);
        assert_eq!(Kind::from_url("sqlite:.indexql/indexql.db").unwrap(), Kind::Sqlite);
        assert_eq!(
            Kind::from_url("postgresql://localhost:5432/indexql").unwrap(),
            Kind::Postgresql
        );
        assert_eq!(Kind::from_url("postgres://localhost/indexql").unwrap(), Kind::Postgresql);
    }

    #[test]
    fn unknown_scheme_is_engine_mismatch() {
        let err = Kind::from_url("mysql://localhost/indexql").unwrap_err();
        assert!(err.is_unsupported_engine());

        let err = Kind::from_url("indexql.db").unwrap_err();
        assert!(err.is_invalid_connection_url());
    }
}
