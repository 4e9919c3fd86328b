use super::{Params, ToSql};

use indexql_core::schema::db;

impl ToSql for db::Type {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let name = match self {
            db::Type::Numeric(precision) => {
                return fmt!(f, "NUMERIC(", u64::from(precision), ")");
            }
            db::Type::Text => "TEXT",
            db::Type::Integer => "INTEGER",
            db::Type::Real => "REAL",
            db::Type::DoublePrecision => "DOUBLE PRECISION",
            db::Type::Blob => "BLOB",
            db::Type::Bytea => "BYTEA",
            db::Type::BigIntText => "BIGNUM_TEXT",
            db::Type::JsonText => "JSON_TEXT",
            db::Type::Jsonb => "JSONB",
        };

        fmt!(f, name);
    }
}
