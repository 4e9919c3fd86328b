mod expr;
pub use expr::Expr;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_like;
pub use expr_like::{ExprLike, Like};

mod key;
pub use key::Key;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by;
pub use order_by::{Direction, OrderBy};

mod row;
pub use row::{Row, Rows};

mod select;
pub use select::Select;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
