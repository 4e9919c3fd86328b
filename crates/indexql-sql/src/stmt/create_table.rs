use super::{ColumnDef, Statement};

use indexql_core::schema::db::Table;

#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: String,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Name of the primary key column
    pub primary_key: String,

    /// Emit `IF NOT EXISTS`
    pub if_not_exists: bool,
}

impl CreateTable {
    fn from_schema(table: &Table, if_not_exists: bool) -> Self {
        Self {
            name: table.name.clone(),
            columns: table.columns.iter().map(ColumnDef::from_schema).collect(),
            primary_key: table.primary_key_column().name.clone(),
            if_not_exists,
        }
    }
}

impl Statement {
    pub fn create_table(table: &Table) -> Self {
        CreateTable::from_schema(table, false).into()
    }

    /// Like [`Statement::create_table`], but tolerates an existing table.
    pub fn create_table_if_not_exists(table: &Table) -> Self {
        CreateTable::from_schema(table, true).into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
