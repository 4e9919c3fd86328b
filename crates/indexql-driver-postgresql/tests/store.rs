#![cfg(feature = "postgresql-tests")]

use indexql_core::{
    driver::{Kind, Store},
    schema::{app, db, Builder},
    stmt::{Direction, Expr, OrderBy, Select, Value},
    BigInt,
};
use indexql_driver_postgresql::{PoolConfig, PostgreSQL};
use indexql_sql::{Serializer, Statement};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgresql tests")
}

/// Recreates the schema's tables with a writable connection.
async fn setup(schema: &db::Schema) -> tokio_postgres::Client {
    let (client, connection) = tokio_postgres::connect(&database_url(), tokio_postgres::NoTls)
        .await
        .unwrap();
    tokio::spawn(connection);

    let serializer = Serializer::postgresql(schema);

    for table in &schema.tables {
        client
            .batch_execute(&format!("DROP TABLE IF EXISTS \"{}\"", table.name))
            .await
            .unwrap();
        let ddl = serializer.serialize(&Statement::create_table(table), &mut Vec::<Value>::new());
        client.batch_execute(&ddl).await.unwrap();
    }

    client
}

async fn store(schema: db::Schema) -> PostgreSQL {
    let mut store = PostgreSQL::connect(&database_url(), &PoolConfig::default()).unwrap();
    store.register_schema(Arc::new(schema)).await.unwrap();
    store
}

#[tokio::test]
async fn round_trip() {
    let app = app::Schema::builder()
        .table(
            "PgRoundTripAccount",
            [
                ("id", app::Column::hex()),
                ("balance", app::Column::bigint()),
                ("isOwner", app::Column::boolean()),
                ("metadata", app::Column::json().optional()),
            ],
        )
        .build()
        .unwrap();
    let schema = Builder::new(Kind::Postgresql).build(&app).unwrap();
    let client = setup(&schema).await;

    client
        .batch_execute(
            "INSERT INTO \"PgRoundTripAccount\" VALUES \
             ('\\xaa', 115792089237316195423570985008687907853269984665640564039457584007913129639935, 1, '{\"a\": 1}'), \
             ('\\xbb', -5, 0, NULL)",
        )
        .await
        .unwrap();

    let table_id = schema.tables[0].id;
    let balance = schema.tables[0].column_by_name("balance").unwrap().id;
    let store = store(schema).await;

    let max = (BigInt::from(1) << 256) - 1;

    let rows = store
        .select(
            &Select::new(table_id)
                .filter(Expr::le(balance, Value::BigInt(max.clone())))
                .order_by(OrderBy {
                    column: balance,
                    direction: Direction::Desc,
                }),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id"), Some(&Value::Bytes(vec![0xaa])));
    assert_eq!(rows[0].get("balance"), Some(&Value::BigInt(max)));
    assert_eq!(rows[0].get("isOwner"), Some(&Value::Bool(true)));
    assert_eq!(
        rows[0].get("metadata"),
        Some(&Value::Json(serde_json::json!({ "a": 1 })))
    );
    assert_eq!(rows[1].get("balance"), Some(&Value::BigInt(BigInt::from(-5))));
    assert_eq!(rows[1].get("metadata"), Some(&Value::Null));

    let raw = store
        .query(
            "SELECT \"balance\" FROM \"PgRoundTripAccount\" WHERE \"id\" = $1",
            &[Value::Bytes(vec![0xbb])],
        )
        .await
        .unwrap();
    assert_eq!(raw.columns, ["balance"]);
    assert_eq!(raw.rows[0].get("balance"), Some(&Value::BigInt(BigInt::from(-5))));
}

#[tokio::test]
async fn rejects_mutation() {
    let app = app::Schema::builder()
        .table("PgReadOnlyProbe", [("id", app::Column::int())])
        .build()
        .unwrap();
    let schema = Builder::new(Kind::Postgresql).build(&app).unwrap();
    let _client = setup(&schema).await;
    let store = store(schema).await;

    let err = store
        .query("UPDATE \"PgReadOnlyProbe\" SET \"id\" = 1", &[])
        .await
        .unwrap_err();
    assert!(err.is_read_only_violation());

    let err = store
        .query(
            "WITH gone AS (DELETE FROM \"PgReadOnlyProbe\" RETURNING 1) SELECT * FROM gone",
            &[],
        )
        .await
        .unwrap_err();
    assert!(err.is_read_only_violation());
}
