use super::Expr;
use crate::schema::db::ColumnId;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprIsNull {
    pub column: ColumnId,
    pub negated: bool,
}

impl Expr {
    pub fn is_null(column: ColumnId) -> Self {
        ExprIsNull {
            column,
            negated: false,
        }
        .into()
    }

    pub fn is_not_null(column: ColumnId) -> Self {
        ExprIsNull {
            column,
            negated: true,
        }
        .into()
    }
}
