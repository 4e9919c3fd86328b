use super::{Column, Enum, Table};
use crate::{Error, Result};

use indexmap::IndexMap;

/// The backend-agnostic schema: declared enums and tables, in declaration
/// order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Schema {
    pub enums: IndexMap<String, Enum>,
    pub tables: IndexMap<String, Table>,
}

/// Collects declarations and validates them in [`SchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    enums: Vec<Enum>,
    tables: Vec<(String, Vec<(String, Column)>)>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        self.enums.get(name)
    }

    /// Checks that the schema can be translated: every table has a usable
    /// `id`, and every enum, reference and relation resolves.
    pub fn verify(&self) -> Result<()> {
        crate::schema::verify::Verify { schema: self }.verify()
    }
}

impl SchemaBuilder {
    pub fn enumeration<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.push(Enum::new(name, values));
        self
    }

    pub fn table<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .collect();
        self.tables.push((name.into(), columns));
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut schema = Schema::default();

        for enumeration in self.enums {
            if schema.enums.contains_key(&enumeration.name) {
                return Err(Error::invalid_schema(format!(
                    "enum `{}` is declared more than once",
                    enumeration.name
                )));
            }
            schema.enums.insert(enumeration.name.clone(), enumeration);
        }

        for (name, columns) in self.tables {
            if schema.tables.contains_key(&name) {
                return Err(Error::invalid_schema(format!(
                    "table `{name}` is declared more than once"
                )));
            }

            let mut table = Table::new(&name);

            for (column_name, column) in columns {
                if table.columns.contains_key(&column_name) {
                    return Err(Error::invalid_schema(format!(
                        "column `{name}.{column_name}` is declared more than once"
                    )));
                }
                table.columns.insert(column_name, column);
            }

            schema.tables.insert(name, table);
        }

        schema.verify()?;
        Ok(schema)
    }
}
