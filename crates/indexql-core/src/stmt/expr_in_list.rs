use super::{Expr, Value};
use crate::schema::db::ColumnId;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub column: ColumnId,
    pub values: Vec<Value>,
    pub negated: bool,
}

impl Expr {
    pub fn in_list(column: ColumnId, values: impl IntoIterator<Item = Value>) -> Self {
        ExprInList {
            column,
            values: values.into_iter().collect(),
            negated: false,
        }
        .into()
    }

    pub fn not_in_list(column: ColumnId, values: impl IntoIterator<Item = Value>) -> Self {
        ExprInList {
            column,
            values: values.into_iter().collect(),
            negated: true,
        }
        .into()
    }
}
