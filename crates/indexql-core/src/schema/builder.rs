use super::{app, db};
use crate::{driver::Kind, err, Result};

use tracing::{debug, info};

/// Translates an [`app::Schema`] into concrete table definitions for one
/// storage engine.
#[derive(Debug)]
pub struct Builder {
    kind: Kind,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    kind: Kind,

    storage_types: &'a crate::driver::StorageTypes,

    /// Tables as they are built
    tables: Vec<db::Table>,
}

impl Builder {
    pub fn new(kind: Kind) -> Self {
        Self { kind }
    }

    pub fn build(&self, app: &app::Schema) -> Result<db::Schema> {
        app.verify()
            .map_err(|e| e.context(err!("failed to translate schema for {}", self.kind)))?;

        let mut builder = BuildSchema {
            kind: self.kind,
            storage_types: &self.kind.capability().storage_types,
            tables: Vec::with_capacity(app.tables.len()),
        };

        for table in app.tables.values() {
            builder.build_table(table)?;
        }

        info!(
            engine = %self.kind,
            tables = builder.tables.len(),
            "translated schema"
        );

        Ok(db::Schema {
            kind: self.kind,
            tables: builder.tables,
        })
    }
}

impl BuildSchema<'_> {
    fn build_table(&mut self, table: &app::Table) -> Result<()> {
        let id = db::TableId(self.tables.len());
        let mut columns = Vec::with_capacity(table.columns.len());
        let mut primary_key = None;

        for (name, column) in table.material_columns() {
            let column_id = db::ColumnId {
                table: id,
                index: columns.len(),
            };

            let (ty, storage_ty) = self.column_types(column).ok_or_else(|| {
                err!(
                    "column `{}.{name}` has no storage type on {}",
                    table.name,
                    self.kind
                )
            })?;

            let is_pk = name == app::Table::ID;

            if is_pk {
                primary_key = Some(column_id);
            }

            columns.push(db::Column {
                id: column_id,
                name: name.to_string(),
                ty,
                storage_ty,
                nullable: !is_pk && column.is_optional(),
                primary_key: is_pk,
            });
        }

        let primary_key = primary_key
            .ok_or_else(|| err!("table `{}` is missing an `id` column", table.name))?;

        debug!(
            table = %table.name,
            columns = columns.len(),
            "translated table"
        );

        self.tables.push(db::Table {
            id,
            name: table.name.clone(),
            columns,
            primary_key,
        });

        Ok(())
    }

    fn column_types(&self, column: &app::Column) -> Option<(crate::stmt::Type, db::Type)> {
        let storage_ty = match column {
            app::Column::Scalar(c) => db::Type::from_scalar(c.ty, self.storage_types),
            app::Column::Reference(c) => db::Type::from_scalar(c.ty, self.storage_types),
            app::Column::Json(_) => self.storage_types.json,
            app::Column::Enum(_) => self.storage_types.enumeration,
            app::Column::One(_) | app::Column::Many(_) => return None,
        };

        Some((column.value_ty()?, storage_ty))
    }
}
