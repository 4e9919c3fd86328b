use super::Value;
use crate::{BigInt, Error, Result};

/// A hashable value that can identify a row: the kinds allowed for an `id`
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    String(String),
    I64(i64),
    Bytes(Vec<u8>),
    BigInt(BigInt),
}

impl TryFrom<Value> for Key {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(Key::String(v)),
            Value::I64(v) => Ok(Key::I64(v)),
            Value::Bytes(v) => Ok(Key::Bytes(v)),
            Value::BigInt(v) => Ok(Key::BigInt(v)),
            other => Err(Error::type_conversion(other.kind_name(), "Key")),
        }
    }
}

impl TryFrom<&Value> for Key {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Key::try_from(value.clone())
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::String(v) => Value::String(v),
            Key::I64(v) => Value::I64(v),
            Key::Bytes(v) => Value::Bytes(v),
            Key::BigInt(v) => Value::BigInt(v),
        }
    }
}
