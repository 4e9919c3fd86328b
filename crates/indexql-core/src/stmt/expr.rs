use super::{ExprBinaryOp, ExprInList, ExprIsNull, ExprLike};

/// A filter expression over the columns of a single table.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// All sub-expressions hold. An empty conjunction is true.
    And(Vec<Expr>),

    /// Any sub-expression holds. An empty disjunction is false.
    Or(Vec<Expr>),

    /// Negation
    Not(Box<Expr>),

    /// `column <op> value`
    BinaryOp(ExprBinaryOp),

    /// `column [NOT] IN (values...)`
    InList(ExprInList),

    /// `column IS [NOT] NULL`
    IsNull(ExprIsNull),

    /// `column [NOT] LIKE pattern`
    Like(ExprLike),
}

impl Expr {
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        let mut exprs: Vec<_> = exprs.into_iter().collect();

        if exprs.len() == 1 {
            exprs.remove(0)
        } else {
            Expr::And(exprs)
        }
    }

    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        let mut exprs: Vec<_> = exprs.into_iter().collect();

        if exprs.len() == 1 {
            exprs.remove(0)
        } else {
            Expr::Or(exprs)
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Expr {
        Expr::Not(Box::new(expr))
    }

    /// Always-true expression.
    pub fn true_() -> Expr {
        Expr::And(vec![])
    }

    /// Always-false expression.
    pub fn false_() -> Expr {
        Expr::Or(vec![])
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expr::And(exprs) if exprs.is_empty())
    }
}

impl From<ExprBinaryOp> for Expr {
    fn from(value: ExprBinaryOp) -> Self {
        Expr::BinaryOp(value)
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Expr::InList(value)
    }
}

impl From<ExprIsNull> for Expr {
    fn from(value: ExprIsNull) -> Self {
        Expr::IsNull(value)
    }
}

impl From<ExprLike> for Expr {
    fn from(value: ExprLike) -> Self {
        Expr::Like(value)
    }
}
