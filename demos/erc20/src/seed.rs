use indexql::{
    driver::Kind,
    schema::{app, Builder},
    stmt::Value,
    BigInt,
};
use indexql_driver_sqlite::bigint;
use indexql_sql::{Serializer, Statement};

use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

const ACCOUNTS: u8 = 5;
const TRANSFERS: u32 = 40;

/// Creates `path` with the demo tables and a small transfer history. The
/// query service only ever opens the file read-only, so this stands in for
/// the indexer that would normally write it.
pub fn seed(path: &Path, schema: &app::Schema) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tables = Builder::new(Kind::Sqlite).build(schema)?;
    let serializer = Serializer::sqlite(&tables);
    let mut connection = Connection::open(path)?;
    let tx = connection.transaction()?;

    for table in &tables.tables {
        let ddl = serializer.serialize(&Statement::create_table(table), &mut Vec::<Value>::new());
        tx.execute(&ddl, [])?;
    }

    for i in 0..ACCOUNTS {
        tx.execute(
            r#"INSERT INTO "Account" ("id", "balance", "isOwner") VALUES (?1, ?2, ?3)"#,
            params![address(i), encode(u64::from(i) * 1_000)?, i == 0],
        )?;
    }

    for i in 0..TRANSFERS {
        let from = (i % u32::from(ACCOUNTS)) as u8;
        let to = ((i + 1) % u32::from(ACCOUNTS)) as u8;

        tx.execute(
            r#"INSERT INTO "TransferEvent" ("id", "amount", "timestamp", "from", "to")
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                format!("transfer-{i:03}"),
                encode(u64::from(i) * 10)?,
                1_700_000_000 + i64::from(i) * 12,
                address(from),
                address(to),
            ],
        )?;
    }

    tx.execute(
        r#"INSERT INTO "Allowance" ("id", "amount", "owner", "spender") VALUES (?1, ?2, ?3, ?4)"#,
        params!["allowance-0-1", encode(u64::MAX)?, address(0), address(1)],
    )?;

    tx.commit()?;

    info!(path = %path.display(), accounts = ACCOUNTS, transfers = TRANSFERS, "seeded demo database");
    Ok(())
}

/// A 20-byte address ending in `n`.
fn address(n: u8) -> Vec<u8> {
    let mut address = vec![0; 20];
    address[19] = n;
    address
}

fn encode(n: u64) -> indexql::Result<String> {
    bigint::encode(&BigInt::from(n))
}
