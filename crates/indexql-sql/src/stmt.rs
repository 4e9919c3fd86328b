mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::CreateTable;

pub use indexql_core::stmt::*;

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTable),
    Select(Select),
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}
