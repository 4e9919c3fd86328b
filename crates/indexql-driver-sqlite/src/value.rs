use crate::bigint;

use indexql_core::{
    schema::db,
    stmt::{self, Value as CoreValue},
    BigInt, Error, Result,
};
use indexql_sql::TypedValue;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

/// A parameter bound into a SQLite statement.
#[derive(Debug)]
pub(crate) struct Value(SqlValue);

impl Value {
    /// Encodes a core value the way SQLite stores it: booleans as 0/1, big
    /// integers with the order-preserving text codec, JSON as text.
    pub(crate) fn encode(value: &CoreValue) -> Result<Self> {
        let value = match value {
            CoreValue::Null => SqlValue::Null,
            CoreValue::Bool(v) => SqlValue::Integer(i64::from(*v)),
            CoreValue::I64(v) => SqlValue::Integer(*v),
            CoreValue::F64(v) => SqlValue::Real(*v),
            CoreValue::String(v) => SqlValue::Text(v.clone()),
            CoreValue::Bytes(v) => SqlValue::Blob(v.clone()),
            CoreValue::BigInt(v) => SqlValue::Text(bigint::encode(v)?),
            CoreValue::Json(v) => SqlValue::Text(serde_json::to_string(v)?),
        };

        Ok(Self(value))
    }

    /// Encodes a parameter compared against a stored column. Integers bound
    /// against a `BIGNUM_TEXT` column use the big-integer codec, so text
    /// comparison matches numeric order.
    pub(crate) fn encode_typed(param: &TypedValue) -> Result<Self> {
        match (&param.value, param.storage_ty) {
            (CoreValue::I64(v), Some(db::Type::BigIntText)) => {
                Ok(Self(SqlValue::Text(bigint::encode(&BigInt::from(*v))?)))
            }
            (value, _) => Self::encode(value),
        }
    }

    /// Decodes a value read from a column of a registered table.
    pub(crate) fn decode_column(value: ValueRef<'_>, column: &db::Column) -> Result<CoreValue> {
        decode(value, Some(column.storage_ty))?.cast(&column.ty)
    }

    /// Decodes a value from a raw query, using the declared type of the
    /// result column when SQLite reports one.
    pub(crate) fn decode_raw(value: ValueRef<'_>, decl_type: Option<&str>) -> Result<CoreValue> {
        decode(value, decl_type.and_then(db::Type::from_sqlite_decl))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::from(&self.0)))
    }
}

fn decode(value: ValueRef<'_>, storage_ty: Option<db::Type>) -> Result<CoreValue> {
    Ok(match value {
        ValueRef::Null => CoreValue::Null,
        ValueRef::Integer(v) => CoreValue::I64(v),
        ValueRef::Real(v) => CoreValue::F64(v),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|_| {
                Error::type_conversion("non-UTF-8 TEXT", stmt::Type::String.name())
            })?;

            match storage_ty {
                Some(db::Type::BigIntText) => CoreValue::BigInt(bigint::decode(text)?),
                Some(db::Type::JsonText) => CoreValue::Json(serde_json::from_str(text)?),
                _ => CoreValue::String(text.to_string()),
            }
        }
        ValueRef::Blob(bytes) => CoreValue::Bytes(bytes.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_by_declared_type() {
        let encoded = bigint::encode(&BigInt::from(-5)).unwrap();

        assert_eq!(
            Value::decode_raw(ValueRef::Text(encoded.as_bytes()), Some("BIGNUM_TEXT")).unwrap(),
            CoreValue::BigInt(BigInt::from(-5))
        );
        assert_eq!(
            Value::decode_raw(ValueRef::Text(b"{\"a\":1}"), Some("JSON_TEXT")).unwrap(),
            CoreValue::Json(serde_json::json!({ "a": 1 }))
        );
        assert_eq!(
            Value::decode_raw(ValueRef::Text(b"plain"), None).unwrap(),
            CoreValue::String("plain".to_string())
        );
    }

    #[test]
    fn malformed_bignum_is_type_conversion() {
        let err = Value::decode_raw(ValueRef::Text(b"12"), Some("BIGNUM_TEXT")).unwrap_err();
        assert!(err.is_type_conversion());
    }

    #[test]
    fn integers_against_bignum_columns_use_the_codec() {
        let bound = |value, storage_ty| {
            let Value(encoded) = Value::encode_typed(&TypedValue { value, storage_ty }).unwrap();
            encoded
        };

        assert_eq!(
            bound(CoreValue::I64(-5), Some(db::Type::BigIntText)),
            SqlValue::Text(bigint::encode(&BigInt::from(-5)).unwrap())
        );
        assert_eq!(bound(CoreValue::I64(-5), Some(db::Type::Integer)), SqlValue::Integer(-5));
        assert_eq!(bound(CoreValue::I64(-5), None), SqlValue::Integer(-5));
    }
}
