mod config;
pub use config::{Config, GraphqlConfig, DEFAULT_DATABASE_URL};

mod connect;

mod db;
pub use db::Db;

pub use indexql_core::{bail, driver, err, schema, stmt, BigInt, Error, Result, Store};
pub use indexql_driver_postgresql::PoolConfig;
pub use indexql_graphql::{dynamic, Request, Response};
