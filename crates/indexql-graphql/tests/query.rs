use indexql_core::{
    async_trait, bail,
    schema::{
        app::{self, Column},
        db::{self, ColumnId},
        Builder,
    },
    stmt::{BinaryOp, Direction, Expr, Row, Rows, Select, Value},
    BigInt, Kind, Result, Store,
};
use indexql_graphql::{
    build_schema, dynamic, execute, DefaultTypeBuilders, LoaderConfig, RequestContext,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Evaluates selects against in-memory rows and counts them per table.
#[derive(Debug)]
struct MemoryStore {
    schema: Arc<db::Schema>,
    rows: HashMap<String, Vec<Row>>,
    selects: Mutex<HashMap<String, usize>>,
}

impl MemoryStore {
    fn selects(&self, table: &str) -> usize {
        self.selects
            .lock()
            .unwrap()
            .get(table)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn kind(&self) -> Kind {
        self.schema.kind
    }

    async fn register_schema(&mut self, schema: Arc<db::Schema>) -> Result<()> {
        self.schema = schema;
        Ok(())
    }

    async fn select(&self, select: &Select) -> Result<Vec<Row>> {
        let table = self.schema.table(select.table);
        *self
            .selects
            .lock()
            .unwrap()
            .entry(table.name.clone())
            .or_default() += 1;

        let mut rows: Vec<Row> = self.rows[&table.name]
            .iter()
            .filter(|row| {
                select
                    .filter
                    .as_ref()
                    .map_or(true, |expr| eval(expr, row, table))
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            for order_by in &select.order_by {
                let name = &table.column(order_by.column).name;
                let ord = compare(a.get(name).unwrap_or(&Value::Null), b.get(name).unwrap_or(&Value::Null))
                    .unwrap_or(Ordering::Equal);
                let ord = match order_by.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = select.limit {
            rows.truncate(limit as usize);
        }

        Ok(rows)
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> Result<Rows> {
        bail!("raw queries are not supported by the memory store")
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn eval(expr: &Expr, row: &Row, table: &db::Table) -> bool {
    let value = |column: ColumnId| {
        row.get(&table.column(column).name)
            .cloned()
            .unwrap_or_default()
    };

    match expr {
        Expr::And(exprs) => exprs.iter().all(|expr| eval(expr, row, table)),
        Expr::Or(exprs) => exprs.iter().any(|expr| eval(expr, row, table)),
        Expr::Not(expr) => !eval(expr, row, table),
        Expr::BinaryOp(binary) => {
            let lhs = value(binary.column);
            if lhs.is_null() {
                return false;
            }
            let Some(ord) = compare(&lhs, &binary.value) else {
                return false;
            };
            match binary.op {
                BinaryOp::Eq => ord == Ordering::Equal,
                BinaryOp::Ne => ord != Ordering::Equal,
                BinaryOp::Gt => ord == Ordering::Greater,
                BinaryOp::Ge => ord != Ordering::Less,
                BinaryOp::Lt => ord == Ordering::Less,
                BinaryOp::Le => ord != Ordering::Greater,
            }
        }
        Expr::InList(in_list) => {
            let lhs = value(in_list.column);
            !lhs.is_null() && in_list.values.contains(&lhs) != in_list.negated
        }
        Expr::IsNull(is_null) => value(is_null.column).is_null() != is_null.negated,
        Expr::Like(like) => {
            let lhs = value(like.column);
            let Some(text) = lhs.as_str() else {
                return false;
            };
            text.contains(&like.needle) != like.negated
        }
    }
}

fn erc20() -> app::Schema {
    app::Schema::builder()
        .table(
            "Account",
            [
                ("id", Column::hex()),
                ("balance", Column::bigint()),
                ("meta", Column::json()),
                ("sent", Column::many("Transfer", "from")),
            ],
        )
        .table(
            "Transfer",
            [
                ("id", Column::string()),
                ("amount", Column::bigint()),
                ("from", Column::hex().references("Account.id")),
                ("fromAccount", Column::one("from")),
                ("to", Column::hex().references("Account.id")),
                ("toAccount", Column::one("to")),
                ("memo", Column::string().optional()),
            ],
        )
        .build()
        .unwrap()
}

fn row(values: impl IntoIterator<Item = (&'static str, Value)>) -> Row {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

struct Harness {
    schema: dynamic::Schema,
    db: Arc<db::Schema>,
    store: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        let app = erc20();
        let db = Arc::new(Builder::new(Kind::Sqlite).build(&app).unwrap());

        let accounts = (0u8..10)
            .map(|i| {
                row([
                    ("id", Value::Bytes(vec![i])),
                    ("balance", Value::BigInt(BigInt::from(u32::from(i) * 100))),
                    (
                        "meta",
                        if i == 3 {
                            Value::Json(serde_json::Value::Null)
                        } else {
                            Value::Json(json!({ "rank": i }))
                        },
                    ),
                ])
            })
            .collect();
        let transfers = (0u8..100)
            .map(|i| {
                row([
                    ("id", Value::String(format!("t{i:03}"))),
                    ("amount", Value::BigInt(BigInt::from(i))),
                    ("from", Value::Bytes(vec![i % 10])),
                    ("to", Value::Bytes(vec![(i + 1) % 10])),
                    (
                        "memo",
                        if i % 2 == 0 {
                            Value::from(format!("memo {i}"))
                        } else {
                            Value::Null
                        },
                    ),
                ])
            })
            .collect();

        let store = Arc::new(MemoryStore {
            schema: db.clone(),
            rows: HashMap::from([
                ("Account".to_string(), accounts),
                ("Transfer".to_string(), transfers),
            ]),
            selects: Mutex::default(),
        });

        Self {
            schema: build_schema(&app, &DefaultTypeBuilders::default()).unwrap(),
            db,
            store,
        }
    }

    async fn run(&self, query: &str) -> (serde_json::Value, Vec<String>) {
        let cx = RequestContext::new(
            self.store.clone() as Arc<dyn Store>,
            self.db.clone(),
            LoaderConfig::default(),
        );
        let response = execute(&self.schema, cx, query).await;
        let errors = response.errors.iter().map(|e| e.message.clone()).collect();
        (response.data.into_json().unwrap(), errors)
    }
}

#[tokio::test]
async fn root_fields_are_named_after_tables() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run("{ __schema { queryType { fields { name } } } }")
        .await;

    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data["__schema"]["queryType"]["fields"],
        json!([
            { "name": "account" },
            { "name": "accounts" },
            { "name": "transfer" },
            { "name": "transfers" },
        ])
    );
}

#[tokio::test]
async fn related_accounts_load_in_one_batch() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run(
            "{ transfers(limit: 100) { items { id fromAccount { id balance } toAccount { id } } } }",
        )
        .await;

    assert_eq!(errors, Vec::<String>::new());

    let items = data["transfers"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 100);
    assert_eq!(
        items[13],
        json!({
            "id": "t013",
            "fromAccount": { "id": "0x03", "balance": "300" },
            "toAccount": { "id": "0x04" },
        })
    );

    assert_eq!(harness.store.selects("Transfer"), 1);
    assert_eq!(harness.store.selects("Account"), 1);
}

#[tokio::test]
async fn singular_field_resolves_by_id() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run(r#"{ found: account(id: "0x07") { balance } missing: account(id: "0xff") { balance } }"#)
        .await;

    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data,
        json!({ "found": { "balance": "700" }, "missing": null })
    );
}

#[tokio::test]
async fn field_errors_leave_siblings_intact() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run(r#"{ bad: account(id: "07") { id } good: account(id: "0x01") { id } }"#)
        .await;

    assert_eq!(
        errors,
        vec!["invalid argument: hex value `07` must start with `0x`".to_string()]
    );
    assert_eq!(data, json!({ "bad": null, "good": { "id": "0x01" } }));
}

#[tokio::test]
async fn null_in_required_json_column_is_a_field_error() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run(r#"{ bad: account(id: "0x03") { id meta } good: account(id: "0x02") { meta } }"#)
        .await;

    assert_eq!(errors, vec!["required column `meta` holds null".to_string()]);
    assert_eq!(data, json!({ "bad": null, "good": { "meta": { "rank": 2 } } }));
}

#[tokio::test]
async fn limit_over_maximum_is_rejected() {
    let harness = Harness::new();
    let (_, errors) = harness.run("{ accounts(limit: 1001) { items { id } } }").await;

    assert_eq!(
        errors,
        vec!["invalid argument: `limit` must be at most 1000; got 1001".to_string()]
    );
}

#[tokio::test]
async fn filters_combine_operators() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run(
            r#"{ transfers(where: { amount_gte: "90", memo: null }, orderBy: "amount", orderDirection: "desc") {
                items { id }
            } }"#,
        )
        .await;

    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data["transfers"]["items"],
        json!([
            { "id": "t099" },
            { "id": "t097" },
            { "id": "t095" },
            { "id": "t093" },
            { "id": "t091" },
        ])
    );
}

#[tokio::test]
async fn cursors_page_forward_and_back() {
    let harness = Harness::new();
    let page = |args: String| {
        format!(
            "{{ accounts(orderBy: \"balance\", orderDirection: \"desc\", limit: 3{args}) {{
                items {{ balance }}
                pageInfo {{ hasNextPage hasPreviousPage startCursor endCursor }}
            }} }}"
        )
    };

    let (first, errors) = harness.run(&page(String::new())).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        first["accounts"]["items"],
        json!([{ "balance": "900" }, { "balance": "800" }, { "balance": "700" }])
    );
    assert_eq!(first["accounts"]["pageInfo"]["hasNextPage"], json!(true));
    assert_eq!(first["accounts"]["pageInfo"]["hasPreviousPage"], json!(false));

    let end = first["accounts"]["pageInfo"]["endCursor"].as_str().unwrap();
    let (second, errors) = harness.run(&page(format!(", after: \"{end}\""))).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        second["accounts"]["items"],
        json!([{ "balance": "600" }, { "balance": "500" }, { "balance": "400" }])
    );
    assert_eq!(second["accounts"]["pageInfo"]["hasPreviousPage"], json!(true));

    let start = second["accounts"]["pageInfo"]["startCursor"].as_str().unwrap();
    let (back, errors) = harness.run(&page(format!(", before: \"{start}\""))).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(back["accounts"]["items"], first["accounts"]["items"]);
    assert_eq!(back["accounts"]["pageInfo"]["hasNextPage"], json!(true));
    assert_eq!(back["accounts"]["pageInfo"]["hasPreviousPage"], json!(false));
}

#[tokio::test]
async fn many_relation_pages_back_references() {
    let harness = Harness::new();
    let (data, errors) = harness
        .run(r#"{ account(id: "0x02") { sent(limit: 3) { items { id } pageInfo { hasNextPage } } } }"#)
        .await;

    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data["account"]["sent"],
        json!({
            "items": [{ "id": "t002" }, { "id": "t012" }, { "id": "t022" }],
            "pageInfo": { "hasNextPage": true },
        })
    );
}
