pub mod driver;
pub use driver::{Kind, Store};

mod error;
pub use error::Error;

pub mod schema;

pub mod stmt;

/// A Result type alias that uses indexql's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;

/// Arbitrary-precision integers, as surfaced by `bigint` columns.
pub use bigdecimal::num_bigint::BigInt;
