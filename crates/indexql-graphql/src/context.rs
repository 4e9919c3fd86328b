use crate::{LoaderConfig, RelationLoader};

use indexql_core::{
    schema::db::{self, ColumnId},
    Error, Result, Store,
};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio_util::sync::CancellationToken;

/// Per-request state read by every resolver.
///
/// Dropping the context cancels any loader batch that has not been
/// dispatched yet.
#[derive(Debug)]
pub struct RequestContext {
    pub store: Arc<dyn Store>,
    pub schema: Arc<db::Schema>,
    pub loaders: Loaders,
}

/// The request's relation loaders, created on first use.
#[derive(Debug)]
pub struct Loaders {
    store: Arc<dyn Store>,
    schema: Arc<db::Schema>,
    config: LoaderConfig,
    cancel: CancellationToken,
    loaders: Mutex<HashMap<ColumnId, Arc<RelationLoader>>>,
}

impl RequestContext {
    pub fn new(store: Arc<dyn Store>, schema: Arc<db::Schema>, config: LoaderConfig) -> Self {
        let loaders = Loaders {
            store: store.clone(),
            schema: schema.clone(),
            config,
            cancel: CancellationToken::new(),
            loaders: Mutex::default(),
        };

        Self {
            store,
            schema,
            loaders,
        }
    }

    /// Looks up a table of the translated schema by name.
    pub fn table(&self, name: &str) -> Result<&db::Table> {
        self.schema
            .table_by_name(name)
            .ok_or_else(|| Error::invalid_argument(format!("unknown table `{name}`")))
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        self.loaders.cancel.cancel();
    }
}

impl Loaders {
    /// The loader for rows of `table` keyed by `column`.
    pub fn get(&self, table: &str, column: &str) -> Result<Arc<RelationLoader>> {
        let db_table = self
            .schema
            .table_by_name(table)
            .ok_or_else(|| Error::invalid_argument(format!("unknown table `{table}`")))?;
        let db_column = db_table.column_by_name(column).ok_or_else(|| {
            Error::invalid_argument(format!("unknown column `{table}.{column}`"))
        })?;

        let mut loaders = self.loaders.lock().unwrap_or_else(PoisonError::into_inner);
        let loader = loaders.entry(db_column.id).or_insert_with(|| {
            Arc::new(RelationLoader::new(
                self.store.clone(),
                (db_table.id, &db_table.name),
                (db_column.id, &db_column.name),
                self.config,
                self.cancel.clone(),
            ))
        });

        Ok(loader.clone())
    }
}
