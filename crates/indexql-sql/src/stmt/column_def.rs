use indexql_core::schema::db;

#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Column storage type
    pub ty: db::Type,

    /// True when the column carries `NOT NULL`
    pub not_null: bool,
}

impl ColumnDef {
    pub(crate) fn from_schema(column: &db::Column) -> Self {
        Self {
            name: column.name.clone(),
            ty: column.storage_ty,
            not_null: !column.nullable,
        }
    }
}
