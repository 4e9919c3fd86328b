use crate::numeric::Numeric;

use indexql_core::{
    stmt::{self, Value as CoreValue},
    BigInt, Error, Result,
};
use std::error::Error as StdError;
use tokio_postgres::{
    types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type},
    Row,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts a PostgreSQL value within a row to a core value, by the wire
    /// type of the result column.
    pub fn from_sql(row: &Row, index: usize) -> Result<CoreValue> {
        let ty = row.columns()[index].type_();

        let value = match *ty {
            Type::BOOL => row.try_get::<_, Option<bool>>(index).map(|v| v.map(CoreValue::Bool)),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(index)
                .map(|v| v.map(|v| CoreValue::I64(v.into()))),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(index)
                .map(|v| v.map(|v| CoreValue::I64(v.into()))),
            Type::INT8 => row.try_get::<_, Option<i64>>(index).map(|v| v.map(CoreValue::I64)),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(index)
                .map(|v| v.map(|v| CoreValue::F64(v.into()))),
            Type::FLOAT8 => row.try_get::<_, Option<f64>>(index).map(|v| v.map(CoreValue::F64)),
            Type::NUMERIC => row
                .try_get::<_, Option<Numeric>>(index)
                .map(|v| v.map(|v| CoreValue::BigInt(v.0))),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => row
                .try_get::<_, Option<String>>(index)
                .map(|v| v.map(CoreValue::String)),
            Type::BYTEA => row
                .try_get::<_, Option<Vec<u8>>>(index)
                .map(|v| v.map(CoreValue::Bytes)),
            Type::JSON | Type::JSONB => row
                .try_get::<_, Option<serde_json::Value>>(index)
                .map(|v| v.map(CoreValue::Json)),
            _ => {
                return Err(Error::type_conversion(
                    format!("postgresql type `{ty}`"),
                    "Value",
                ))
            }
        };

        Ok(value.map_err(Error::driver)?.unwrap_or(CoreValue::Null))
    }
}

fn out_of_range(value: &CoreValue, ty: &Type) -> Box<dyn StdError + Sync + Send> {
    Box::new(Error::type_conversion(format!("{value:?}"), pg_name(ty)))
}

fn pg_name(ty: &Type) -> &'static str {
    match *ty {
        Type::INT2 => "INT2",
        Type::INT4 => "INT4",
        Type::INT8 => "INT8",
        Type::NUMERIC => "NUMERIC",
        _ => "postgresql type",
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn StdError + Sync + Send>>
    where
        Self: Sized,
    {
        let mismatch = || out_of_range(&self.0, ty);

        match &self.0 {
            stmt::Value::Null => Ok(IsNull::Yes),
            stmt::Value::Bool(value) => match *ty {
                Type::BOOL => value.to_sql(ty, out),
                // Booleans are stored as 0/1 integers.
                Type::INT2 => i16::from(*value).to_sql(ty, out),
                Type::INT4 => i32::from(*value).to_sql(ty, out),
                Type::INT8 => i64::from(*value).to_sql(ty, out),
                _ => Err(mismatch()),
            },
            stmt::Value::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value).map_err(|_| mismatch())?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value).map_err(|_| mismatch())?.to_sql(ty, out),
                Type::INT8 => value.to_sql(ty, out),
                Type::FLOAT8 => (*value as f64).to_sql(ty, out),
                Type::NUMERIC => Numeric(BigInt::from(*value)).to_sql(ty, out),
                _ => Err(mismatch()),
            },
            stmt::Value::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::FLOAT8 => value.to_sql(ty, out),
                _ => Err(mismatch()),
            },
            stmt::Value::BigInt(value) => match *ty {
                Type::NUMERIC => Numeric(value.clone()).to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => {
                    let value: i64 = value.to_string().parse().map_err(|_| mismatch())?;
                    Value(stmt::Value::I64(value)).to_sql(ty, out)
                }
                Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
                _ => Err(mismatch()),
            },
            stmt::Value::String(value) => value.to_sql(ty, out),
            stmt::Value::Bytes(value) => value.to_sql(ty, out),
            stmt::Value::Json(value) => value.to_sql(ty, out),
        }
    }

    accepts!(
        BOOL, INT2, INT4, INT8, FLOAT4, FLOAT8, NUMERIC, TEXT, VARCHAR, BPCHAR, NAME, UNKNOWN,
        BYTEA, JSON, JSONB
    );
    to_sql_checked!();
}
