use super::{Comma, Ident, Params, ToSql};

use crate::stmt::{self, Expr};

impl ToSql for &Expr {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        match self {
            Expr::And(exprs) if exprs.is_empty() => fmt!(f, "TRUE"),
            Expr::Or(exprs) if exprs.is_empty() => fmt!(f, "FALSE"),
            Expr::And(exprs) => fmt!(f, "(", Delimited(exprs, " AND "), ")"),
            Expr::Or(exprs) => fmt!(f, "(", Delimited(exprs, " OR "), ")"),
            Expr::Not(expr) => fmt!(f, "NOT (", &**expr, ")"),
            Expr::BinaryOp(expr) => expr.to_sql(f),
            Expr::InList(expr) => expr.to_sql(f),
            Expr::IsNull(expr) => {
                let column = f.serializer.column(expr.column);
                let op = if expr.negated {
                    " IS NOT NULL"
                } else {
                    " IS NULL"
                };
                fmt!(f, Ident(&column.name), op);
            }
            Expr::Like(expr) => expr.to_sql(f),
        }
    }
}

impl ToSql for &stmt::ExprBinaryOp {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let column = f.serializer.column(self.column);
        let placeholder = f.params.push(&self.value, Some(column.storage_ty));
        let op = self.op.to_string();

        fmt!(f, Ident(&column.name), " ", op.as_str(), " ", placeholder);
    }
}

impl ToSql for &stmt::ExprInList {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        if self.values.is_empty() {
            return fmt!(f, if self.negated { "TRUE" } else { "FALSE" });
        }

        let column = f.serializer.column(self.column);
        let placeholders: Vec<_> = self
            .values
            .iter()
            .map(|value| f.params.push(value, Some(column.storage_ty)))
            .collect();
        let op = if self.negated { " NOT IN (" } else { " IN (" };

        fmt!(f, Ident(&column.name), op, Comma(placeholders), ")");
    }
}

impl ToSql for &stmt::ExprLike {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let column = f.serializer.column(self.column);
        let pattern = stmt::Value::String(self.pattern());
        let placeholder = f.params.push(&pattern, Some(column.storage_ty));
        let op = if self.negated { " NOT LIKE " } else { " LIKE " };

        fmt!(f, Ident(&column.name), op, placeholder, " ESCAPE '\\'");
    }
}

struct Delimited<'a>(&'a [Expr], &'static str);

impl ToSql for Delimited<'_> {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let mut s = "";
        for expr in self.0 {
            fmt!(f, s, expr);
            s = self.1;
        }
    }
}
