use indexql_core::schema::db::{Schema, Table};
use indexmap::IndexMap;

/// Tables registered with the store, by name.
#[derive(Debug, Default)]
pub struct Registry {
    tables: IndexMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    table: Table,

    /// Quoted column list in declaration order, used for reflection queries.
    projection: String,
}

impl Registry {
    pub(crate) fn register(&mut self, schema: &Schema) {
        for table in &schema.tables {
            let projection = table
                .columns
                .iter()
                .map(|column| format!("\"{}\"", column.name.replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(", ");

            self.tables.insert(
                table.name.clone(),
                Entry {
                    table: table.clone(),
                    projection,
                },
            );
        }
    }

    /// The concrete definition of a registered table.
    pub fn describe(&self, name: &str) -> Option<&Table> {
        self.tables.get(name).map(|entry| &entry.table)
    }

    /// The quoted column list of a registered table.
    pub fn projection(&self, name: &str) -> Option<&str> {
        self.tables.get(name).map(|entry| entry.projection.as_str())
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables.values().map(|entry| &entry.table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexql_core::{
        driver::Kind,
        schema::{app, db, Builder},
    };

    #[test]
    fn describes_registered_tables() {
        let app = app::Schema::builder()
            .table(
                "Account",
                [
                    ("id", app::Column::hex()),
                    ("balance", app::Column::bigint()),
                    ("transfers", app::Column::many("Transfer", "from")),
                ],
            )
            .table(
                "Transfer",
                [
                    ("id", app::Column::string()),
                    ("from", app::Column::hex().references("Account.id")),
                ],
            )
            .build()
            .unwrap();
        let schema = Builder::new(Kind::Postgresql).build(&app).unwrap();

        let mut registry = Registry::default();
        registry.register(&schema);

        assert_eq!(registry.len(), 2);

        let account = registry.describe("Account").unwrap();
        assert_eq!(account.column_by_name("balance").unwrap().storage_ty, db::Type::Numeric(78));
        assert_eq!(registry.projection("Account"), Some("\"id\", \"balance\""));
        assert!(registry.describe("Missing").is_none());
    }
}
