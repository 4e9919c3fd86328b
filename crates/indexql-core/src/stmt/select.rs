use super::{Expr, OrderBy};
use crate::schema::db::TableId;

/// A read of rows from a single table.
///
/// This is the only statement shape the stores execute from typed callers:
/// there is no insert, update or delete counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: TableId,

    /// Row filter; `None` selects every row.
    pub filter: Option<Expr>,

    pub order_by: Vec<OrderBy>,

    pub limit: Option<u64>,
}

impl Select {
    pub fn new(table: TableId) -> Self {
        Self {
            table,
            filter: None,
            order_by: vec![],
            limit: None,
        }
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = match self.filter.take() {
            Some(existing) => Some(Expr::and([existing, expr])),
            None => Some(expr),
        };
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
