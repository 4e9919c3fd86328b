//! Conversions between stored values and their GraphQL/JSON representation.

use super::scalar;

use async_graphql::{dynamic::TypeRef, Name, Value as GqlValue};
use indexql_core::{
    err,
    schema::app::{Column, ColumnKind, Scalar},
    stmt::Value,
    BigInt, Error, Result,
};
use serde_json::Value as Json;

/// The GraphQL type name a material column is exposed as.
pub(super) fn type_name(column: &Column) -> Option<&str> {
    match column {
        Column::Scalar(c) => Some(scalar_type_name(c.ty)),
        Column::Reference(c) => Some(scalar_type_name(c.ty)),
        Column::Json(_) => Some(scalar::JSON),
        Column::Enum(c) => Some(&c.ty),
        Column::One(_) | Column::Many(_) => None,
    }
}

fn scalar_type_name(ty: Scalar) -> &'static str {
    match ty {
        Scalar::String | Scalar::Hex => TypeRef::STRING,
        Scalar::Int => TypeRef::INT,
        Scalar::Boolean => TypeRef::BOOLEAN,
        Scalar::Float => TypeRef::FLOAT,
        Scalar::BigInt => scalar::BIG_INT,
    }
}

pub(super) fn to_graphql(value: Value, column: &Column) -> Result<GqlValue> {
    Ok(match value {
        Value::Null => GqlValue::Null,
        Value::Bool(v) => GqlValue::Boolean(v),
        Value::I64(v) => GqlValue::Number(v.into()),
        Value::F64(v) => float(v).map(GqlValue::Number).unwrap_or(GqlValue::Null),
        Value::String(v) if matches!(column, Column::Enum(_)) => GqlValue::Enum(Name::new(v)),
        Value::String(v) => GqlValue::String(v),
        Value::Bytes(v) => GqlValue::String(hex_string(&v)),
        Value::BigInt(v) => GqlValue::String(v.to_string()),
        Value::Json(v) => GqlValue::from_json(v)?,
    })
}

/// Converts the value stored in `name`. A required column that holds null,
/// including a JSON `null` literal, is an error.
pub(super) fn column_to_graphql(name: &str, value: Value, column: &Column) -> Result<GqlValue> {
    let value = to_graphql(value, column)?;
    if value == GqlValue::Null && !column.is_optional() {
        return Err(err!("required column `{name}` holds null"));
    }
    Ok(value)
}

/// The JSON form of a value, as embedded in cursors.
pub(super) fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::I64(v) => Json::from(*v),
        Value::F64(v) => float(*v).map(Json::Number).unwrap_or(Json::Null),
        Value::String(v) => Json::String(v.clone()),
        Value::Bytes(v) => Json::String(hex_string(v)),
        Value::BigInt(v) => Json::String(v.to_string()),
        Value::Json(v) => v.clone(),
    }
}

/// Reads an argument value for `column`. JSON `null` is [`Value::Null`].
pub(super) fn from_json(json: Json, column: &Column) -> Result<Value> {
    if json.is_null() {
        return Ok(Value::Null);
    }

    match column {
        Column::Scalar(c) => scalar_from_json(json, c.ty),
        Column::Reference(c) => scalar_from_json(json, c.ty),
        Column::Enum(_) => match json {
            Json::String(v) => Ok(Value::String(v)),
            other => Err(mismatch(ColumnKind::Enum, &other)),
        },
        Column::Json(_) => Ok(Value::Json(json)),
        Column::One(_) | Column::Many(_) => Err(Error::invalid_argument(
            "relation columns cannot be compared to values",
        )),
    }
}

fn scalar_from_json(json: Json, ty: Scalar) -> Result<Value> {
    match (ty, json) {
        (Scalar::String, Json::String(v)) => Ok(Value::String(v)),
        (Scalar::Boolean, Json::Bool(v)) => Ok(Value::Bool(v)),
        (Scalar::Int, Json::Number(n)) => match n.as_i64() {
            Some(v) => Ok(Value::I64(v)),
            None => Err(mismatch(ColumnKind::Int, &Json::Number(n))),
        },
        (Scalar::Float, Json::Number(n)) => match n.as_f64() {
            Some(v) => Ok(Value::F64(v)),
            None => Err(mismatch(ColumnKind::Float, &Json::Number(n))),
        },
        (Scalar::Hex, Json::String(v)) => parse_hex(&v),
        (Scalar::BigInt, Json::String(v)) => parse_bigint(&v),
        (Scalar::BigInt, Json::Number(n)) if n.is_i64() || n.is_u64() => parse_bigint(&n.to_string()),
        (ty, json) => Err(mismatch(ty.into(), &json)),
    }
}

pub(super) fn parse_hex(text: &str) -> Result<Value> {
    let digits = text.strip_prefix("0x").ok_or_else(|| {
        Error::invalid_argument(format!("hex value `{text}` must start with `0x`"))
    })?;

    hex::decode(digits)
        .map(Value::Bytes)
        .map_err(|err| Error::invalid_argument(format!("invalid hex value `{text}`: {err}")))
}

pub(super) fn parse_bigint(text: &str) -> Result<Value> {
    text.parse::<BigInt>()
        .map(Value::BigInt)
        .map_err(|_| Error::invalid_argument(format!("invalid bigint value `{text}`")))
}

fn hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn float(v: f64) -> Option<serde_json::Number> {
    serde_json::Number::from_f64(v)
}

fn mismatch(kind: ColumnKind, json: &Json) -> Error {
    Error::invalid_argument(format!("expected {kind} value; got `{json}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_columns_reject_null() {
        let err = column_to_graphql("meta", Value::Json(Json::Null), &Column::json()).unwrap_err();
        assert_eq!(err.to_string(), "required column `meta` holds null");
        assert!(column_to_graphql("balance", Value::Null, &Column::bigint()).is_err());

        assert_eq!(
            column_to_graphql("meta", Value::Json(Json::Null), &Column::json().optional()).unwrap(),
            GqlValue::Null
        );
        assert_eq!(
            column_to_graphql("meta", Value::Json(Json::from(1)), &Column::json()).unwrap(),
            GqlValue::Number(1.into())
        );
    }

    #[test]
    fn hex_round_trips_through_json() {
        let value = parse_hex("0x00ff10").unwrap();
        assert_eq!(value, Value::Bytes(vec![0x00, 0xff, 0x10]));
        assert_eq!(to_json(&value), Json::String("0x00ff10".to_string()));
    }

    #[test]
    fn hex_requires_prefix() {
        let err = parse_hex("00ff").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn bigint_accepts_strings_and_integers() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(
            from_json(Json::String(max.to_string()), &Column::bigint()).unwrap(),
            Value::BigInt(max.parse().unwrap())
        );
        assert_eq!(
            from_json(Json::from(7), &Column::bigint()).unwrap(),
            Value::BigInt(BigInt::from(7))
        );
    }

    #[test]
    fn null_is_null_for_every_kind() {
        for column in [Column::string(), Column::int(), Column::hex(), Column::json()] {
            assert_eq!(from_json(Json::Null, &column).unwrap(), Value::Null);
        }
    }

    #[test]
    fn kind_mismatch_names_expected_kind() {
        let err = from_json(Json::String("1".to_string()), &Column::int()).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: expected int value; got `\"1\"`");
    }

    #[test]
    fn enum_values_surface_as_enum() {
        let value = to_graphql(Value::from("APPROVED"), &Column::enumeration("Status")).unwrap();
        assert_eq!(value, GqlValue::Enum(Name::new("APPROVED")));
    }
}
