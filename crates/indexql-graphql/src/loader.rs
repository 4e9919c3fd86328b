use indexql_core::{
    err,
    schema::db::{ColumnId, TableId},
    stmt::{Expr, Key, Row, Select, Value},
    Result, Store,
};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Batching parameters for [`RelationLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// How long the first pending key waits for company before the batch is
    /// dispatched. Zero means a single scheduler yield.
    pub batch_delay: Duration,

    /// Dispatch immediately once this many keys are pending.
    pub max_batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_delay: Duration::from_millis(1),
            max_batch_size: 1000,
        }
    }
}

/// `None` until the batch holding the key completes.
type Slot = Option<Result<Option<Row>>>;

/// Request-scoped loader for rows of one table, looked up by one column.
///
/// Loads issued before the flush point are coalesced into a single
/// `SELECT ... WHERE column IN (...)`. Results, including errors, are cached
/// for the lifetime of the loader.
#[derive(Debug)]
pub struct RelationLoader {
    store: Arc<dyn Store>,
    table: TableId,
    column: ColumnId,
    table_name: String,
    column_name: String,
    config: LoaderConfig,
    cancel: CancellationToken,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    /// One receiver per requested key. Waiters hold clones.
    cache: HashMap<Key, watch::Receiver<Slot>>,

    /// Keys not yet dispatched.
    pending: Vec<(Key, watch::Sender<Slot>)>,

    /// A flush task is sleeping.
    scheduled: bool,
}

type Batch = Vec<(Key, watch::Sender<Slot>)>;

impl RelationLoader {
    pub(crate) fn new(
        store: Arc<dyn Store>,
        table: (TableId, &str),
        column: (ColumnId, &str),
        config: LoaderConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            table: table.0,
            column: column.0,
            table_name: table.1.to_string(),
            column_name: column.1.to_string(),
            config,
            cancel,
            state: Mutex::default(),
        }
    }

    /// Loads the row whose column equals `key`.
    pub async fn load(self: &Arc<Self>, key: Key) -> Result<Option<Row>> {
        let rx = self.enqueue(key);
        self.wait(rx).await
    }

    /// Loads several keys as one batch; results are in the order of `keys`.
    pub async fn load_many(
        self: &Arc<Self>,
        keys: impl IntoIterator<Item = Key>,
    ) -> Result<Vec<Option<Row>>> {
        let receivers: Vec<_> = keys.into_iter().map(|key| self.enqueue(key)).collect();

        let mut rows = Vec::with_capacity(receivers.len());
        for rx in receivers {
            rows.push(self.wait(rx).await?);
        }
        Ok(rows)
    }

    async fn wait(&self, mut rx: watch::Receiver<Slot>) -> Result<Option<Row>> {
        let slot = rx.wait_for(Option::is_some).await.map_err(|_| {
            err!(
                "load of `{}.{}` was cancelled before its batch ran",
                self.table_name,
                self.column_name
            )
        })?;

        match &*slot {
            Some(result) => result.clone(),
            None => Ok(None),
        }
    }

    fn enqueue(self: &Arc<Self>, key: Key) -> watch::Receiver<Slot> {
        let mut state = self.state();

        if let Some(rx) = state.cache.get(&key) {
            return rx.clone();
        }

        let (tx, rx) = watch::channel(None);
        state.cache.insert(key.clone(), rx.clone());
        state.pending.push((key, tx));

        if state.pending.len() >= self.config.max_batch_size {
            let batch = std::mem::take(&mut state.pending);
            let loader = self.clone();
            tokio::spawn(async move { loader.dispatch(batch).await });
        } else if !state.scheduled {
            state.scheduled = true;
            let loader = self.clone();
            tokio::spawn(async move { loader.flush().await });
        }

        rx
    }

    async fn flush(self: Arc<Self>) {
        tokio::select! {
            _ = self.cancel.cancelled() => {
                let abandoned = self.take_pending();
                if !abandoned.is_empty() {
                    warn!(
                        table = %self.table_name,
                        column = %self.column_name,
                        keys = abandoned.len(),
                        "request dropped before batch dispatch"
                    );
                }
                return;
            }
            _ = pause(self.config.batch_delay) => {}
        }

        let batch = self.take_pending();
        self.dispatch(batch).await;
    }

    async fn dispatch(&self, batch: Batch) {
        if batch.is_empty() {
            return;
        }

        // The cache keeps one receiver per key; any other receiver is a waiter.
        // Count and evict under one guard so `enqueue` never clones a receiver
        // whose sender is being dropped.
        let (live, abandoned): (Batch, Batch) = {
            let mut state = self.state();
            let (live, abandoned): (Batch, Batch) = batch
                .into_iter()
                .partition(|(_, tx)| tx.receiver_count() > 1);

            for (key, _) in &abandoned {
                state.cache.remove(key);
            }

            (live, abandoned)
        };

        if live.is_empty() {
            warn!(
                table = %self.table_name,
                column = %self.column_name,
                keys = abandoned.len(),
                "abandoning batch with no waiters"
            );
            return;
        }

        debug!(
            table = %self.table_name,
            column = %self.column_name,
            keys = live.len(),
            "dispatching relation batch"
        );

        let select = Select::new(self.table).filter(Expr::in_list(
            self.column,
            live.iter().map(|(key, _)| Value::from(key.clone())),
        ));

        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                warn!(
                    table = %self.table_name,
                    column = %self.column_name,
                    keys = live.len(),
                    "request dropped during batch"
                );
                return;
            }
            result = self.store.select(&select) => result,
        };

        match result {
            Ok(rows) => {
                let mut by_key = HashMap::with_capacity(rows.len());
                for row in rows {
                    let key = row
                        .get(&self.column_name)
                        .and_then(|value| Key::try_from(value).ok());
                    if let Some(key) = key {
                        by_key.entry(key).or_insert(row);
                    }
                }

                for (key, tx) in live {
                    let _ = tx.send(Some(Ok(by_key.get(&key).cloned())));
                }
            }
            Err(err) => {
                for (_, tx) in live {
                    let _ = tx.send(Some(Err(err.clone())));
                }
            }
        }
    }

    fn take_pending(&self) -> Batch {
        let mut state = self.state();
        state.scheduled = false;
        std::mem::take(&mut state.pending)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexql_core::{
        async_trait, bail,
        schema::db::Schema,
        stmt::Rows,
        Kind,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingStore {
        rows: Vec<Row>,
        selects: AtomicUsize,
        keys: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Store for CountingStore {
        fn kind(&self) -> Kind {
            Kind::Sqlite
        }

        async fn register_schema(&mut self, _schema: Arc<Schema>) -> Result<()> {
            Ok(())
        }

        async fn select(&self, select: &Select) -> Result<Vec<Row>> {
            self.selects.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                bail!("store unavailable");
            }

            let Some(Expr::InList(in_list)) = &select.filter else {
                bail!("expected an IN filter");
            };
            self.keys.fetch_add(in_list.values.len(), Ordering::SeqCst);

            Ok(self
                .rows
                .iter()
                .filter(|row| row.get("id").is_some_and(|v| in_list.values.contains(v)))
                .cloned()
                .collect())
        }

        async fn query(&self, _sql: &str, _params: &[Value]) -> Result<Rows> {
            bail!("raw queries are not supported by this store")
        }
    }

    fn account(id: &str) -> Row {
        [
            ("id".to_string(), Value::from(id)),
            ("balance".to_string(), Value::I64(id.len() as i64)),
        ]
        .into_iter()
        .collect()
    }

    fn loader(store: Arc<CountingStore>, config: LoaderConfig) -> Arc<RelationLoader> {
        Arc::new(RelationLoader::new(
            store,
            (TableId(0), "Account"),
            (ColumnId { table: TableId(0), index: 0 }, "id"),
            config,
            CancellationToken::new(),
        ))
    }

    fn key(id: &str) -> Key {
        Key::String(id.to_string())
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_select() {
        let store = Arc::new(CountingStore {
            rows: vec![account("a"), account("bb")],
            ..Default::default()
        });
        let loader = loader(store.clone(), LoaderConfig::default());

        let (a, b, a_again, missing) = tokio::join!(
            loader.load(key("a")),
            loader.load(key("bb")),
            loader.load(key("a")),
            loader.load(key("ccc")),
        );

        assert_eq!(a.unwrap(), Some(account("a")));
        assert_eq!(b.unwrap(), Some(account("bb")));
        assert_eq!(a_again.unwrap(), Some(account("a")));
        assert_eq!(missing.unwrap(), None);
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
        assert_eq!(store.keys.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn results_are_cached_for_the_request() {
        let store = Arc::new(CountingStore {
            rows: vec![account("a")],
            ..Default::default()
        });
        let loader = loader(store.clone(), LoaderConfig::default());

        assert_eq!(loader.load(key("a")).await.unwrap(), Some(account("a")));
        assert_eq!(loader.load(key("a")).await.unwrap(), Some(account("a")));
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_delay_batches_after_one_yield() {
        let store = Arc::new(CountingStore {
            rows: vec![account("a"), account("bb")],
            ..Default::default()
        });
        let config = LoaderConfig {
            batch_delay: Duration::ZERO,
            ..Default::default()
        };
        let loader = loader(store.clone(), config);

        let rows = loader.load_many([key("a"), key("bb")]).await.unwrap();
        assert_eq!(rows, vec![Some(account("a")), Some(account("bb"))]);
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn full_batches_dispatch_immediately() {
        let store = Arc::new(CountingStore::default());
        let config = LoaderConfig {
            batch_delay: Duration::from_secs(3600),
            max_batch_size: 2,
        };
        let loader = loader(store.clone(), config);

        let rows = loader.load_many([key("a"), key("bb")]).await.unwrap();
        assert_eq!(rows, vec![None, None]);
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_errors_reach_every_waiter() {
        let store = Arc::new(CountingStore {
            fail: true,
            ..Default::default()
        });
        let loader = loader(store.clone(), LoaderConfig::default());

        let (a, b) = tokio::join!(loader.load(key("a")), loader.load(key("bb")));
        assert_eq!(a.unwrap_err().to_string(), "store unavailable");
        assert_eq!(b.unwrap_err().to_string(), "store unavailable");
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_batches_never_run() {
        let store = Arc::new(CountingStore::default());
        let cancel = CancellationToken::new();
        let loader = Arc::new(RelationLoader::new(
            store.clone(),
            (TableId(0), "Account"),
            (ColumnId { table: TableId(0), index: 0 }, "id"),
            LoaderConfig {
                batch_delay: Duration::from_millis(50),
                ..Default::default()
            },
            cancel.clone(),
        ));

        let pending = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(key("a")).await }
        });
        tokio::task::yield_now().await;
        cancel.cancel();

        let err = pending.await.unwrap().unwrap_err();
        assert!(err.to_string().contains("cancelled"));
        assert_eq!(store.selects.load(Ordering::SeqCst), 0);
    }

    /// Starts a load on its own task and drops it once the key is pending.
    async fn abandon(loader: &Arc<RelationLoader>, id: &str) {
        let handle = tokio::spawn({
            let loader = loader.clone();
            let key = key(id);
            async move { loader.load(key).await }
        });
        tokio::task::yield_now().await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn reload_after_dropped_waiter_joins_the_batch() {
        let store = Arc::new(CountingStore {
            rows: vec![account("a")],
            ..Default::default()
        });
        let loader = loader(
            store.clone(),
            LoaderConfig {
                batch_delay: Duration::from_millis(20),
                ..Default::default()
            },
        );

        abandon(&loader, "a").await;

        assert_eq!(loader.load(key("a")).await.unwrap(), Some(account("a")));
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn abandoned_keys_load_again_on_request() {
        let store = Arc::new(CountingStore {
            rows: vec![account("a")],
            ..Default::default()
        });
        let loader = loader(
            store.clone(),
            LoaderConfig {
                batch_delay: Duration::from_millis(5),
                ..Default::default()
            },
        );

        abandon(&loader, "a").await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.selects.load(Ordering::SeqCst), 0);

        assert_eq!(loader.load(key("a")).await.unwrap(), Some(account("a")));
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }
}
