use super::Type;
use crate::{BigInt, Error, Result};

/// A value read from, or bound into, a read statement.
///
/// Values carry their logical representation: a `bigint` column surfaces as
/// [`Value::BigInt`] and a `hex` column as [`Value::Bytes`], regardless of how
/// the storage engine encodes them.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// Double-precision float
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Arbitrary-precision integer
    BigInt(BigInt),

    /// JSON document
    Json(serde_json::Value),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Self::BigInt(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            other => Err(Error::type_conversion(other.kind_name(), "Bool")),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            other => Err(Error::type_conversion(other.kind_name(), "String")),
        }
    }

    /// Returns true if this value is acceptable for a column of logical type `ty`.
    pub fn is_a(&self, ty: &Type) -> bool {
        matches!(
            (self, ty),
            (Self::Null, _)
                | (Self::Bool(_), Type::Bool)
                | (Self::I64(_), Type::I64)
                | (Self::F64(_), Type::F64)
                | (Self::String(_), Type::String)
                | (Self::Bytes(_), Type::Bytes)
                | (Self::BigInt(_), Type::BigInt)
                | (Self::Json(_), Type::Json)
        )
    }

    /// Coerces an integer-stored boolean (0/1) into [`Value::Bool`] when the
    /// logical type asks for it.
    pub fn cast(self, ty: &Type) -> Result<Value> {
        match (self, ty) {
            (Self::I64(v), Type::Bool) => match v {
                0 => Ok(Self::Bool(false)),
                1 => Ok(Self::Bool(true)),
                _ => Err(Error::type_conversion(format!("I64({v})"), "Bool")),
            },
            (Self::I64(v), Type::F64) => Ok(Self::F64(v as f64)),
            (Self::I64(v), Type::BigInt) => Ok(Self::BigInt(BigInt::from(v))),
            (value, ty) if value.is_a(ty) => Ok(value),
            (value, ty) => Err(Error::type_conversion(value.kind_name(), ty.name())),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::I64(_) => "I64",
            Self::F64(_) => "F64",
            Self::String(_) => "String",
            Self::Bytes(_) => "Bytes",
            Self::BigInt(_) => "BigInt",
            Self::Json(_) => "Json",
            Self::Null => "Null",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I64(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::BigInt(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}
