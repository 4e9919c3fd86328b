mod schema;
mod seed;

use indexql::{driver::Kind, stmt::Value, Config, Db};

use std::path::Path;
use tracing::info;

const DEFAULT_QUERY: &str = r#"{
  accounts(orderBy: "balance", orderDirection: "desc", limit: 3) {
    items {
      id
      balance
      transferFromEvents(limit: 2) {
        items { id amount toAccount { id } }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("indexql=info".parse()?),
        )
        .init();

    let schema = schema::erc20()?;
    let config = Config::from_env()?;

    if Kind::from_url(&config.database_url)? == Kind::Sqlite {
        if let Some(path) = config.database_url.strip_prefix("sqlite:") {
            let path = Path::new(path);
            if path != Path::new(":memory:") && !path.exists() {
                seed::seed(path, &schema)?;
            }
        }
    }

    let db = Db::connect(schema, config).await?;

    // Query text from the first argument, or a sample over the seeded data.
    let query = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_QUERY.to_string());
    let response = db.execute(query).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    let accounts = db.query(r#"SELECT * FROM "Account" LIMIT 1"#, &[]).await?;
    match accounts.rows.first().and_then(|row| row.get("balance")) {
        Some(Value::BigInt(balance)) => println!("Balance: {balance}"),
        _ => println!("Not Found!"),
    }

    if let Err(err) = db.query(r#"UPDATE "Account" SET "isOwner" = 1"#, &[]).await {
        info!(%err, "writes are rejected");
    }

    Ok(())
}
