use super::{Ident, Params, ToSql};

use crate::stmt;

impl ToSql for &stmt::CreateTable {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };

        fmt!(f, "CREATE TABLE ", if_not_exists, Ident(&self.name), " (\n");

        for column in &self.columns {
            fmt!(f, "    ", column, ",\n");
        }

        fmt!(f, "    PRIMARY KEY (", Ident(&self.primary_key), ")\n)");
    }
}
