//! Opaque page cursors: URL-safe base64 of the JSON array
//! `[orderValue, id]`.

use super::convert;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use indexql_core::{
    schema::{
        app::{self, Column},
        db::ColumnId,
    },
    stmt::{Direction, Expr, Row, Value},
    Error, Result,
};
use serde_json::Value as Json;

/// A decoded cursor position.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Position {
    pub(super) order: Value,
    pub(super) id: Value,
}

pub(super) fn encode(row: &Row, order_by: &str) -> Result<String> {
    let field = |name: &str| row.get(name).map(convert::to_json).unwrap_or(Json::Null);
    let json = serde_json::to_vec(&Json::Array(vec![field(order_by), field(app::Table::ID)]))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub(super) fn decode(cursor: &str, order_column: &Column, id_column: &Column) -> Result<Position> {
    let invalid = || Error::invalid_argument(format!("malformed cursor `{cursor}`"));

    let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid())?;
    let Ok(Json::Array(parts)) = serde_json::from_slice::<Json>(&bytes) else {
        return Err(invalid());
    };
    let Ok([order, id]) = <[Json; 2]>::try_from(parts) else {
        return Err(invalid());
    };

    let order = convert::from_json(order, order_column).map_err(|err| err.context(invalid()))?;
    let id = convert::from_json(id, id_column).map_err(|err| err.context(invalid()))?;
    if id.is_null() {
        return Err(invalid());
    }

    Ok(Position { order, id })
}

/// Rows strictly after `position` when ordered by `order` then `id`, both in
/// `direction`. Null sorts before every other value.
pub(super) fn after(
    position: Position,
    order: ColumnId,
    id: ColumnId,
    direction: Direction,
) -> Expr {
    let id_after = match direction {
        Direction::Asc => Expr::gt(id, position.id.clone()),
        Direction::Desc => Expr::lt(id, position.id.clone()),
    };

    if order == id {
        return id_after;
    }

    let order_after = match (direction, &position.order) {
        (Direction::Asc, Value::Null) => Expr::is_not_null(order),
        (Direction::Asc, value) => Expr::gt(order, value.clone()),
        (Direction::Desc, Value::Null) => Expr::false_(),
        (Direction::Desc, value) => Expr::or([Expr::lt(order, value.clone()), Expr::is_null(order)]),
    };

    let order_equal = match position.order {
        Value::Null => Expr::is_null(order),
        value => Expr::eq(order, value),
    };

    Expr::or([order_after, Expr::and([order_equal, id_after])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexql_core::{schema::db::TableId, BigInt};
    use pretty_assertions::assert_eq;

    fn row(id: &str, balance: Option<i64>) -> Row {
        [
            ("id".to_string(), Value::from(id)),
            ("balance".to_string(), balance.map(BigInt::from).into()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn cursors_are_url_safe_base64_json() {
        let cursor = encode(&row("a", Some(10)), "balance").unwrap();
        let bytes = URL_SAFE_NO_PAD.decode(&cursor).unwrap();
        assert_eq!(
            serde_json::from_slice::<Json>(&bytes).unwrap(),
            serde_json::json!(["10", "a"])
        );

        let position = decode(&cursor, &Column::bigint(), &Column::string()).unwrap();
        assert_eq!(
            position,
            Position {
                order: Value::BigInt(BigInt::from(10)),
                id: Value::from("a"),
            }
        );
    }

    #[test]
    fn null_order_values_survive() {
        let cursor = encode(&row("a", None), "balance").unwrap();
        let position = decode(&cursor, &Column::bigint().optional(), &Column::string()).unwrap();
        assert_eq!(position.order, Value::Null);
    }

    #[test]
    fn malformed_cursors_are_rejected() {
        for cursor in ["%%%", "bm90IGpzb24", "WyJhIl0"] {
            let err = decode(cursor, &Column::string(), &Column::string()).unwrap_err();
            assert!(err.to_string().contains("malformed cursor"), "{err}");
        }
    }

    #[test]
    fn ordering_on_id_compares_id_only() {
        let id = ColumnId { table: TableId(0), index: 0 };
        let position = Position {
            order: Value::from("b"),
            id: Value::from("b"),
        };
        assert_eq!(
            after(position, id, id, Direction::Desc),
            Expr::lt(id, Value::from("b"))
        );
    }

    #[test]
    fn null_position_ascending() {
        let id = ColumnId { table: TableId(0), index: 0 };
        let order = ColumnId { table: TableId(0), index: 1 };
        let position = Position {
            order: Value::Null,
            id: Value::from("a"),
        };

        assert_eq!(
            after(position, order, id, Direction::Asc),
            Expr::or([
                Expr::is_not_null(order),
                Expr::and([Expr::is_null(order), Expr::gt(id, Value::from("a"))]),
            ])
        );
    }
}
