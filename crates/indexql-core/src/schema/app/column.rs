use crate::stmt;

/// A column of an abstract table.
///
/// Material columns (`Scalar`, `Json`, `Enum`, `Reference`) are stored by
/// every engine. `One` and `Many` are virtual: they only exist in the query
/// schema, where they resolve related rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Scalar(ScalarColumn),
    Json(JsonColumn),
    Enum(EnumColumn),
    Reference(ReferenceColumn),
    One(OneColumn),
    Many(ManyColumn),
}

/// Primitive column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    String,
    Int,
    Boolean,
    Float,
    Hex,
    BigInt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarColumn {
    pub ty: Scalar,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonColumn {
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumColumn {
    /// Name of a declared enum.
    pub ty: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceColumn {
    pub ty: Scalar,

    /// Target in `"<Table>.id"` form.
    pub references: String,

    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneColumn {
    /// Name of a reference column on the same table.
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManyColumn {
    /// Table holding the back-reference.
    pub table: String,

    /// Reference column on `table` pointing at this table.
    pub column: String,
}

/// Discriminant of [`Column`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Int,
    Boolean,
    Float,
    Hex,
    BigInt,
    Json,
    Enum,
    Reference,
    One,
    Many,
}

impl Column {
    pub fn string() -> Self {
        Self::scalar(Scalar::String)
    }

    pub fn int() -> Self {
        Self::scalar(Scalar::Int)
    }

    pub fn boolean() -> Self {
        Self::scalar(Scalar::Boolean)
    }

    pub fn float() -> Self {
        Self::scalar(Scalar::Float)
    }

    pub fn hex() -> Self {
        Self::scalar(Scalar::Hex)
    }

    pub fn bigint() -> Self {
        Self::scalar(Scalar::BigInt)
    }

    pub fn scalar(ty: Scalar) -> Self {
        Self::Scalar(ScalarColumn {
            ty,
            optional: false,
        })
    }

    pub fn json() -> Self {
        Self::Json(JsonColumn { optional: false })
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(EnumColumn {
            ty: name.into(),
            optional: false,
        })
    }

    pub fn one(reference: impl Into<String>) -> Self {
        Self::One(OneColumn {
            reference: reference.into(),
        })
    }

    pub fn many(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Many(ManyColumn {
            table: table.into(),
            column: column.into(),
        })
    }

    /// Turns a scalar column into a reference to `target` (`"<Table>.id"`).
    /// Other column kinds are returned unchanged.
    pub fn references(self, target: impl Into<String>) -> Self {
        match self {
            Self::Scalar(ScalarColumn { ty, optional }) => Self::Reference(ReferenceColumn {
                ty,
                references: target.into(),
                optional,
            }),
            other => other,
        }
    }

    /// Marks the column as optional. Has no effect on virtual columns.
    pub fn optional(mut self) -> Self {
        match &mut self {
            Self::Scalar(c) => c.optional = true,
            Self::Json(c) => c.optional = true,
            Self::Enum(c) => c.optional = true,
            Self::Reference(c) => c.optional = true,
            Self::One(_) | Self::Many(_) => {}
        }
        self
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Self::Scalar(c) => c.optional,
            Self::Json(c) => c.optional,
            Self::Enum(c) => c.optional,
            Self::Reference(c) => c.optional,
            Self::One(_) | Self::Many(_) => false,
        }
    }

    /// True if the column is stored. Virtual relation columns are not.
    pub fn is_material(&self) -> bool {
        !matches!(self, Self::One(_) | Self::Many(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    pub fn as_reference(&self) -> Option<&ReferenceColumn> {
        match self {
            Self::Reference(c) => Some(c),
            _ => None,
        }
    }

    /// The scalar kind of a scalar or reference column.
    pub fn scalar_ty(&self) -> Option<Scalar> {
        match self {
            Self::Scalar(c) => Some(c.ty),
            Self::Reference(c) => Some(c.ty),
            _ => None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Scalar(c) => c.ty.into(),
            Self::Json(_) => ColumnKind::Json,
            Self::Enum(_) => ColumnKind::Enum,
            Self::Reference(_) => ColumnKind::Reference,
            Self::One(_) => ColumnKind::One,
            Self::Many(_) => ColumnKind::Many,
        }
    }

    /// The logical value type of a material column.
    pub fn value_ty(&self) -> Option<stmt::Type> {
        match self {
            Self::Scalar(ScalarColumn { ty, .. }) | Self::Reference(ReferenceColumn { ty, .. }) => {
                Some(ty.value_ty())
            }
            Self::Json(_) => Some(stmt::Type::Json),
            Self::Enum(_) => Some(stmt::Type::String),
            Self::One(_) | Self::Many(_) => None,
        }
    }
}

impl Scalar {
    pub fn value_ty(self) -> stmt::Type {
        match self {
            Scalar::String => stmt::Type::String,
            Scalar::Int => stmt::Type::I64,
            Scalar::Boolean => stmt::Type::Bool,
            Scalar::Float => stmt::Type::F64,
            Scalar::Hex => stmt::Type::Bytes,
            Scalar::BigInt => stmt::Type::BigInt,
        }
    }

    /// Kinds an `id` column may have.
    pub fn is_key(self) -> bool {
        matches!(
            self,
            Scalar::String | Scalar::Int | Scalar::Hex | Scalar::BigInt
        )
    }
}

impl From<Scalar> for ColumnKind {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::String => ColumnKind::String,
            Scalar::Int => ColumnKind::Int,
            Scalar::Boolean => ColumnKind::Boolean,
            Scalar::Float => ColumnKind::Float,
            Scalar::Hex => ColumnKind::Hex,
            Scalar::BigInt => ColumnKind::BigInt,
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ColumnKind::String => "string",
            ColumnKind::Int => "int",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Float => "float",
            ColumnKind::Hex => "hex",
            ColumnKind::BigInt => "bigint",
            ColumnKind::Json => "json",
            ColumnKind::Enum => "enum",
            ColumnKind::Reference => "reference",
            ColumnKind::One => "one",
            ColumnKind::Many => "many",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_keeps_optionality() {
        let column = Column::hex().optional().references("Account.id");

        assert_eq!(
            column,
            Column::Reference(ReferenceColumn {
                ty: Scalar::Hex,
                references: "Account.id".to_string(),
                optional: true,
            })
        );
    }

    #[test]
    fn virtual_columns_are_not_material() {
        assert!(!Column::one("from").is_material());
        assert!(!Column::many("Transfer", "from").is_material());
        assert!(!Column::many("Transfer", "from").optional().is_optional());
        assert!(Column::json().is_material());
    }
}
