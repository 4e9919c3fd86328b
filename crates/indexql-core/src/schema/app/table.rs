use super::Column;

use indexmap::IndexMap;

/// An abstract table: an ordered set of named columns, one of which is `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: IndexMap<String, Column>,
}

impl Table {
    pub const ID: &'static str = "id";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn id_column(&self) -> Option<&Column> {
        self.columns.get(Self::ID)
    }

    /// Stored columns in declaration order.
    pub fn material_columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.columns
            .iter()
            .filter(|(_, column)| column.is_material())
            .map(|(name, column)| (name.as_str(), column))
    }
}
