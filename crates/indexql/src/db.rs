use crate::{connect, Config, GraphqlConfig};

use indexql_core::{
    driver::Kind,
    schema::{self, app, db},
    stmt::{Row, Rows, Select, Value},
    Result, Store,
};
use indexql_graphql::{dynamic, DefaultTypeBuilders, Request, RequestContext, Response};

use std::{fmt, sync::Arc};
use tracing::info;

/// Shared state between all `Db` clones.
struct Shared {
    app: app::Schema,
    schema: Arc<db::Schema>,
    store: Arc<dyn Store>,
    graphql: dynamic::Schema,
    config: GraphqlConfig,
}

/// A read-only handle over an indexed database, serving typed selects, raw
/// SQL and GraphQL queries. Cheap to clone.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    /// Translates `app` for the engine named by the configured URL, connects,
    /// registers the translated tables with the store, and assembles the
    /// query schema.
    pub async fn connect(app: app::Schema, config: Config) -> Result<Db> {
        let kind = Kind::from_url(&config.database_url)?;
        let store = connect::connect(kind, &config)
            .map_err(|e| e.context(connect::connect_error(&config.database_url)))?;

        info!(
            engine = %kind,
            url = %connect::redact(&config.database_url),
            "connected"
        );

        Self::with_store(app, store, config.graphql).await
    }

    /// Like [`Db::connect`], over a store opened by the caller.
    pub async fn with_store(
        app: app::Schema,
        mut store: Box<dyn Store>,
        config: GraphqlConfig,
    ) -> Result<Db> {
        let schema = Arc::new(schema::Builder::new(store.kind()).build(&app)?);
        store.register_schema(schema.clone()).await?;

        let graphql =
            indexql_graphql::build_schema(&app, &DefaultTypeBuilders::new(config.limits()))?;

        info!(
            engine = %schema.kind,
            tables = schema.tables.len(),
            "database ready"
        );

        Ok(Db {
            shared: Arc::new(Shared {
                app,
                schema,
                store: Arc::from(store),
                graphql,
                config,
            }),
        })
    }

    pub fn app_schema(&self) -> &app::Schema {
        &self.shared.app
    }

    /// The tables as translated for this engine.
    pub fn schema(&self) -> &Arc<db::Schema> {
        &self.shared.schema
    }

    pub fn graphql_schema(&self) -> &dynamic::Schema {
        &self.shared.graphql
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.shared.store
    }

    /// Runs a GraphQL request with its own relation loaders.
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        let context = RequestContext::new(
            self.shared.store.clone(),
            self.shared.schema.clone(),
            self.shared.config.loader(),
        );

        indexql_graphql::execute(&self.shared.graphql, context, request).await
    }

    pub async fn select(&self, select: &Select) -> Result<Vec<Row>> {
        self.shared.store.select(select).await
    }

    /// Runs raw SQL. Statements that could write are rejected.
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<Rows> {
        self.shared.store.query(sql, params).await
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("engine", &self.shared.schema.kind)
            .field("store", &self.shared.store)
            .field("config", &self.shared.config)
            .finish()
    }
}
