use super::{Column, ColumnId, Table, TableId};
use crate::driver::Kind;

/// Concrete table definitions for one storage engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Engine the storage types were chosen for.
    pub kind: Kind,

    pub tables: Vec<Table>,
}

impl Schema {
    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        self.table(id.table)
            .columns
            .get(id.index)
            .expect("invalid column ID")
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}
