use super::app::{Column, Schema, Table};
use crate::{Error, Result};

pub(super) struct Verify<'a> {
    pub(super) schema: &'a Schema,
}

impl Verify<'_> {
    pub(super) fn verify(&self) -> Result<()> {
        for enumeration in self.schema.enums.values() {
            if enumeration.values.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "enum `{}` has no values",
                    enumeration.name
                )));
            }

            for (i, value) in enumeration.values.iter().enumerate() {
                if enumeration.values[..i].contains(value) {
                    return Err(Error::invalid_schema(format!(
                        "enum `{}` repeats value `{value}`",
                        enumeration.name
                    )));
                }
            }
        }

        for table in self.schema.tables.values() {
            self.verify_id(table)?;

            for (name, column) in &table.columns {
                self.verify_column(table, name, column)?;
            }
        }

        Ok(())
    }

    fn verify_id(&self, table: &Table) -> Result<()> {
        let Some(id) = table.id_column() else {
            return Err(Error::invalid_schema(format!(
                "table `{}` is missing an `id` column",
                table.name
            )));
        };

        let key = matches!(id, Column::Scalar(c) if c.ty.is_key())
            || matches!(id, Column::Reference(c) if c.ty.is_key());

        if !key {
            return Err(Error::invalid_schema(format!(
                "column `{}.id` has kind `{}`; an `id` must be string, int, hex or bigint",
                table.name,
                id.kind()
            )));
        }

        if id.is_optional() {
            return Err(Error::invalid_schema(format!(
                "column `{}.id` cannot be optional",
                table.name
            )));
        }

        Ok(())
    }

    fn verify_column(&self, table: &Table, name: &str, column: &Column) -> Result<()> {
        match column {
            Column::Scalar(_) | Column::Json(_) => {}
            Column::Enum(c) => {
                if self.schema.enumeration(&c.ty).is_none() {
                    return Err(Error::invalid_schema(format!(
                        "column `{}.{name}` has unknown enum `{}`",
                        table.name, c.ty
                    )));
                }
            }
            Column::Reference(c) => {
                let target = self.reference_target(&c.references).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "column `{}.{name}` references `{}`; expected `<Table>.id` of a declared table",
                        table.name, c.references
                    ))
                })?;

                let target_ty = target.id_column().and_then(Column::scalar_ty);

                if target_ty != Some(c.ty) {
                    return Err(Error::invalid_schema(format!(
                        "column `{}.{name}` has kind `{}` but `{}` has a different key kind",
                        table.name,
                        column.kind(),
                        c.references
                    )));
                }
            }
            Column::One(c) => {
                let is_reference = table
                    .column(&c.reference)
                    .map(Column::is_reference)
                    .unwrap_or(false);

                if !is_reference {
                    return Err(Error::invalid_schema(format!(
                        "column `{}.{name}` resolves `{}`, which is not a reference column of `{}`",
                        table.name, c.reference, table.name
                    )));
                }
            }
            Column::Many(c) => {
                let back_reference = self
                    .schema
                    .table(&c.table)
                    .and_then(|target| target.column(&c.column))
                    .and_then(Column::as_reference)
                    .and_then(|reference| self.reference_target(&reference.references))
                    .map(|target| target.name == table.name)
                    .unwrap_or(false);

                if !back_reference {
                    return Err(Error::invalid_schema(format!(
                        "column `{}.{name}` lists `{}.{}`, which is not a reference to `{}`",
                        table.name, c.table, c.column, table.name
                    )));
                }
            }
        }

        Ok(())
    }

    fn reference_target(&self, references: &str) -> Option<&Table> {
        let (table, column) = references.split_once('.')?;

        if column != Table::ID {
            return None;
        }

        self.schema.table(table)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::app::{Column, Schema};

    fn err(builder: crate::schema::app::SchemaBuilder) -> String {
        builder.build().unwrap_err().to_string()
    }

    #[test]
    fn missing_id() {
        assert_eq!(
            err(Schema::builder().table("Account", [("balance", Column::bigint())])),
            "invalid schema: table `Account` is missing an `id` column"
        );
    }

    #[test]
    fn optional_id() {
        assert_eq!(
            err(Schema::builder().table("Account", [("id", Column::hex().optional())])),
            "invalid schema: column `Account.id` cannot be optional"
        );
    }

    #[test]
    fn id_kind() {
        assert_eq!(
            err(Schema::builder().table("Flag", [("id", Column::boolean())])),
            "invalid schema: column `Flag.id` has kind `boolean`; an `id` must be string, int, hex or bigint"
        );
        assert_eq!(
            err(Schema::builder().table("Doc", [("id", Column::json())])),
            "invalid schema: column `Doc.id` has kind `json`; an `id` must be string, int, hex or bigint"
        );
    }

    #[test]
    fn unknown_enum() {
        assert_eq!(
            err(Schema::builder().table(
                "Transfer",
                [("id", Column::string()), ("kind", Column::enumeration("Kind"))]
            )),
            "invalid schema: column `Transfer.kind` has unknown enum `Kind`"
        );
    }

    #[test]
    fn empty_enum() {
        assert_eq!(
            err(Schema::builder().enumeration("Kind", Vec::<String>::new())),
            "invalid schema: enum `Kind` has no values"
        );
    }

    #[test]
    fn dangling_reference() {
        assert_eq!(
            err(Schema::builder().table(
                "Transfer",
                [("id", Column::string()), ("from", Column::hex().references("Account.id"))]
            )),
            "invalid schema: column `Transfer.from` references `Account.id`; expected `<Table>.id` of a declared table"
        );
    }

    #[test]
    fn reference_kind_mismatch() {
        assert_eq!(
            err(Schema::builder()
                .table("Account", [("id", Column::hex())])
                .table(
                    "Transfer",
                    [("id", Column::string()), ("from", Column::string().references("Account.id"))]
                )),
            "invalid schema: column `Transfer.from` has kind `reference` but `Account.id` has a different key kind"
        );
    }

    #[test]
    fn one_requires_reference() {
        assert_eq!(
            err(Schema::builder().table(
                "Transfer",
                [("id", Column::string()), ("amount", Column::bigint()), ("fromAccount", Column::one("amount"))]
            )),
            "invalid schema: column `Transfer.fromAccount` resolves `amount`, which is not a reference column of `Transfer`"
        );
    }

    #[test]
    fn many_requires_back_reference() {
        assert_eq!(
            err(Schema::builder()
                .table("Account", [("id", Column::hex()), ("transfers", Column::many("Transfer", "from"))])
                .table("Transfer", [("id", Column::string()), ("from", Column::hex())])),
            "invalid schema: column `Account.transfers` lists `Transfer.from`, which is not a reference to `Account`"
        );
    }

    #[test]
    fn relations_resolve() {
        Schema::builder()
            .table(
                "Account",
                [("id", Column::hex()), ("transfers", Column::many("Transfer", "from"))],
            )
            .table(
                "Transfer",
                [
                    ("id", Column::string()),
                    ("from", Column::hex().references("Account.id")),
                    ("fromAccount", Column::one("from")),
                ],
            )
            .build()
            .unwrap();
    }
}
