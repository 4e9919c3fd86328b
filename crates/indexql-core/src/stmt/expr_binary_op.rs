use super::{BinaryOp, Expr, Value};
use crate::schema::db::ColumnId;

/// Compares a column against a value.
///
/// ```text
/// eq(balance, 10)   // "balance" = 10
/// lt(balance, 10)   // "balance" < 10
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    /// The column on the left-hand side.
    pub column: ColumnId,

    /// The operator to apply.
    pub op: BinaryOp,

    /// The right-hand side value. Never null; null checks use [`Expr::IsNull`].
    pub value: Value,
}

impl Expr {
    pub fn binary_op(column: ColumnId, op: BinaryOp, value: impl Into<Value>) -> Self {
        ExprBinaryOp {
            column,
            op,
            value: value.into(),
        }
        .into()
    }

    pub fn eq(column: ColumnId, value: impl Into<Value>) -> Self {
        Expr::binary_op(column, BinaryOp::Eq, value)
    }

    pub fn ne(column: ColumnId, value: impl Into<Value>) -> Self {
        Expr::binary_op(column, BinaryOp::Ne, value)
    }

    pub fn gt(column: ColumnId, value: impl Into<Value>) -> Self {
        Expr::binary_op(column, BinaryOp::Gt, value)
    }

    pub fn ge(column: ColumnId, value: impl Into<Value>) -> Self {
        Expr::binary_op(column, BinaryOp::Ge, value)
    }

    pub fn lt(column: ColumnId, value: impl Into<Value>) -> Self {
        Expr::binary_op(column, BinaryOp::Lt, value)
    }

    pub fn le(column: ColumnId, value: impl Into<Value>) -> Self {
        Expr::binary_op(column, BinaryOp::Le, value)
    }
}
