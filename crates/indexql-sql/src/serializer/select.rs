use super::{Comma, Ident, Params, ToSql};

use crate::stmt;

impl ToSql for &stmt::Select {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let table = f.serializer.table(self.table);
        let columns = Comma(table.columns.iter().map(|column| Ident(&column.name)));

        fmt!(f, "SELECT ", columns, " FROM ", Ident(&table.name));

        if let Some(filter) = &self.filter {
            if !filter.is_true() {
                fmt!(f, " WHERE ", filter);
            }
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(&self.order_by));
        }

        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT ", limit);
        }
    }
}

impl ToSql for &stmt::OrderBy {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let column = f.serializer.column(self.column);

        // Nulls sort as the smallest value on both engines.
        let direction = match self.direction {
            stmt::Direction::Asc => " ASC NULLS FIRST",
            stmt::Direction::Desc => " DESC NULLS LAST",
        };

        fmt!(f, Ident(&column.name), direction);
    }
}
