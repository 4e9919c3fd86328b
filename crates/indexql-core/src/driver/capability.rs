use crate::schema::db;

#[derive(Debug)]
pub struct Capability {
    /// Column storage types used by the engine
    pub storage_types: StorageTypes,
}

/// The storage type chosen for each column kind.
#[derive(Debug)]
pub struct StorageTypes {
    pub string: db::Type,
    pub int: db::Type,
    pub boolean: db::Type,
    pub float: db::Type,
    pub hex: db::Type,
    pub bigint: db::Type,
    pub json: db::Type,
    pub enumeration: db::Type,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        storage_types: StorageTypes::SQLITE,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        storage_types: StorageTypes::POSTGRESQL,
    };
}

impl StorageTypes {
    /// SQLite storage types
    pub const SQLITE: StorageTypes = StorageTypes {
        string: db::Type::Text,
        int: db::Type::Integer,
        boolean: db::Type::Integer,
        float: db::Type::Real,
        hex: db::Type::Blob,

        // Declared names must not contain "INT" or SQLite assigns INTEGER
        // affinity and coerces the padded digits into a lossy number.
        bigint: db::Type::BigIntText,
        json: db::Type::JsonText,
        enumeration: db::Type::Text,
    };

    pub const POSTGRESQL: StorageTypes = StorageTypes {
        string: db::Type::Text,
        int: db::Type::Integer,
        boolean: db::Type::Integer,
        float: db::Type::DoublePrecision,
        hex: db::Type::Bytea,

        // 2^256 - 1 has 78 decimal digits.
        bigint: db::Type::Numeric(78),
        json: db::Type::Jsonb,
        enumeration: db::Type::Text,
    };
}
