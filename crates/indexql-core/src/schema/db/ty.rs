use crate::driver::StorageTypes;
use crate::schema::app::Scalar;

/// Concrete column types across both supported engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// `TEXT`
    Text,

    /// `INTEGER`. Also holds booleans as 0/1.
    Integer,

    /// SQLite `REAL`
    Real,

    /// PostgreSQL `DOUBLE PRECISION`
    DoublePrecision,

    /// PostgreSQL `NUMERIC(precision)`
    Numeric(u32),

    /// SQLite `BLOB`
    Blob,

    /// PostgreSQL `BYTEA`
    Bytea,

    /// SQLite text column holding order-preserving big-integer strings.
    BigIntText,

    /// SQLite text column holding serialized JSON.
    JsonText,

    /// PostgreSQL `JSONB`
    Jsonb,
}

impl Type {
    /// Maps a scalar column kind onto the engine's storage type.
    pub fn from_scalar(ty: Scalar, storage_types: &StorageTypes) -> Type {
        match ty {
            Scalar::String => storage_types.string,
            Scalar::Int => storage_types.int,
            Scalar::Boolean => storage_types.boolean,
            Scalar::Float => storage_types.float,
            Scalar::Hex => storage_types.hex,
            Scalar::BigInt => storage_types.bigint,
        }
    }

    /// Recovers a type from a declared SQLite column type.
    pub fn from_sqlite_decl(decl: &str) -> Option<Type> {
        match decl.to_ascii_uppercase().as_str() {
            "TEXT" => Some(Type::Text),
            "INTEGER" => Some(Type::Integer),
            "REAL" => Some(Type::Real),
            "BLOB" => Some(Type::Blob),
            "BIGNUM_TEXT" => Some(Type::BigIntText),
            "JSON_TEXT" => Some(Type::JsonText),
            _ => None,
        }
    }
}
