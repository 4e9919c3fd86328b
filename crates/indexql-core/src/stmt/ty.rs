/// The logical type of a stored column, independent of the storage engine.
///
/// Booleans are stored as integers by both engines and `bigint` values have a
/// dedicated codec on SQLite, but every column still decodes into the value
/// kind named here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I64,
    F64,
    String,
    Bytes,
    BigInt,
    Json,
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Type::Bool => "Bool",
            Type::I64 => "I64",
            Type::F64 => "F64",
            Type::String => "String",
            Type::Bytes => "Bytes",
            Type::BigInt => "BigInt",
            Type::Json => "Json",
        }
    }

    /// True when values of this type have a meaningful order for range filters.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Type::I64 | Type::F64 | Type::BigInt)
    }
}
