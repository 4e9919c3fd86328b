use super::convert;

use async_graphql::{
    dynamic::{InputObject, InputValue, TypeRef},
    Value as GqlValue,
};
use indexql_core::{
    schema::{
        app::{self, Column, Scalar},
        db::{self, ColumnId},
    },
    stmt::{Expr, Like, Value},
    Error, Result,
};
use serde_json::Value as Json;

/// Operators a filter field can apply, identified by the field-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Not,
    In,
    NotIn,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    NotStartsWith,
    NotEndsWith,
}

impl Op {
    /// Every operator, in the order filter fields are declared.
    const ALL: [Op; 14] = [
        Op::Eq,
        Op::Not,
        Op::In,
        Op::NotIn,
        Op::Gt,
        Op::Lt,
        Op::Gte,
        Op::Lte,
        Op::Contains,
        Op::NotContains,
        Op::StartsWith,
        Op::EndsWith,
        Op::NotStartsWith,
        Op::NotEndsWith,
    ];

    /// Suffixed operators, longest suffix first so `_not_in` wins over `_in`.
    const BY_SUFFIX: [Op; 13] = [
        Op::NotStartsWith,
        Op::NotEndsWith,
        Op::NotContains,
        Op::StartsWith,
        Op::EndsWith,
        Op::Contains,
        Op::NotIn,
        Op::Not,
        Op::Gte,
        Op::Lte,
        Op::In,
        Op::Gt,
        Op::Lt,
    ];

    fn suffix(self) -> &'static str {
        match self {
            Op::Eq => "",
            Op::Not => "_not",
            Op::In => "_in",
            Op::NotIn => "_not_in",
            Op::Gt => "_gt",
            Op::Lt => "_lt",
            Op::Gte => "_gte",
            Op::Lte => "_lte",
            Op::Contains => "_contains",
            Op::NotContains => "_not_contains",
            Op::StartsWith => "_starts_with",
            Op::EndsWith => "_ends_with",
            Op::NotStartsWith => "_not_starts_with",
            Op::NotEndsWith => "_not_ends_with",
        }
    }

    fn is_list(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    fn applies_to(self, column: &Column) -> bool {
        match self {
            Op::Eq | Op::Not | Op::In | Op::NotIn => is_filterable(column),
            Op::Gt | Op::Lt | Op::Gte | Op::Lte => matches!(
                column.scalar_ty(),
                Some(Scalar::Int | Scalar::Float | Scalar::BigInt)
            ),
            Op::Contains
            | Op::NotContains
            | Op::StartsWith
            | Op::EndsWith
            | Op::NotStartsWith
            | Op::NotEndsWith => column.scalar_ty() == Some(Scalar::String),
        }
    }
}

fn is_filterable(column: &Column) -> bool {
    column.is_material() && !matches!(column, Column::Json(_))
}

pub(super) fn filter_name(table: &str) -> String {
    format!("{table}Filter")
}

/// The `<Table>Filter` input object.
pub(super) fn filter_type(table: &app::Table) -> InputObject {
    let mut filter = InputObject::new(filter_name(&table.name));

    for (name, column) in table.material_columns() {
        let Some(ty) = convert::type_name(column) else {
            continue;
        };

        for op in Op::ALL.into_iter().filter(|op| op.applies_to(column)) {
            let type_ref = if op.is_list() {
                TypeRef::named_list(ty)
            } else {
                TypeRef::named(ty)
            };
            filter = filter.field(InputValue::new(format!("{name}{}", op.suffix()), type_ref));
        }
    }

    filter
}

/// Translates a `where` argument into a filter expression. Conditions are
/// combined with AND.
pub(super) fn where_expr(table: &app::Table, db_table: &db::Table, arg: &GqlValue) -> Result<Expr> {
    let GqlValue::Object(fields) = arg else {
        return Err(Error::invalid_argument(format!(
            "`where` for `{}` must be an object",
            table.name
        )));
    };

    let mut conditions = Vec::with_capacity(fields.len());

    for (field, value) in fields {
        let field = field.as_str();
        let (column_name, op) = parse_field(table, field)?;
        let column = table.column(column_name).ok_or_else(|| unknown(table, field))?;
        let db_column = db_table
            .column_by_name(column_name)
            .ok_or_else(|| unknown(table, field))?;

        let json = value.clone().into_json()?;
        conditions.push(condition(db_column.id, column, field, op, json)?);
    }

    Ok(Expr::and(conditions))
}

fn parse_field<'a>(table: &app::Table, field: &'a str) -> Result<(&'a str, Op)> {
    if table.column(field).is_some_and(is_filterable) {
        return Ok((field, Op::Eq));
    }

    for op in Op::BY_SUFFIX {
        let Some(column_name) = field.strip_suffix(op.suffix()) else {
            continue;
        };

        if table.column(column_name).is_some_and(|c| op.applies_to(c)) {
            return Ok((column_name, op));
        }
    }

    Err(unknown(table, field))
}

fn condition(column: ColumnId, def: &Column, field: &str, op: Op, json: Json) -> Result<Expr> {
    if op.is_list() {
        let Json::Array(items) = json else {
            return Err(Error::invalid_argument(format!("`{field}` must be a list")));
        };

        let mut values = Vec::with_capacity(items.len());
        let mut has_null = false;
        for item in items {
            match convert::from_json(item, def)? {
                Value::Null => has_null = true,
                value => values.push(value),
            }
        }

        return Ok(match op {
            Op::In if has_null => Expr::or([Expr::in_list(column, values), Expr::is_null(column)]),
            Op::In => Expr::in_list(column, values),
            _ if has_null => Expr::and([
                Expr::not_in_list(column, values),
                Expr::is_not_null(column),
            ]),
            _ => Expr::not_in_list(column, values),
        });
    }

    let value = convert::from_json(json, def)?;

    if value.is_null() {
        return match op {
            Op::Eq => Ok(Expr::is_null(column)),
            Op::Not => Ok(Expr::is_not_null(column)),
            _ => Err(Error::invalid_argument(format!("`{field}` cannot be null"))),
        };
    }

    Ok(match op {
        Op::Eq => Expr::eq(column, value),
        Op::Not => Expr::ne(column, value),
        Op::Gt => Expr::gt(column, value),
        Op::Lt => Expr::lt(column, value),
        Op::Gte => Expr::ge(column, value),
        Op::Lte => Expr::le(column, value),
        Op::Contains => like(column, Like::Contains, value, false)?,
        Op::NotContains => like(column, Like::Contains, value, true)?,
        Op::StartsWith => like(column, Like::StartsWith, value, false)?,
        Op::EndsWith => like(column, Like::EndsWith, value, false)?,
        Op::NotStartsWith => like(column, Like::StartsWith, value, true)?,
        Op::NotEndsWith => like(column, Like::EndsWith, value, true)?,
        Op::In | Op::NotIn => unreachable!("list operators handled above"),
    })
}

fn like(column: ColumnId, like: Like, value: Value, negated: bool) -> Result<Expr> {
    Ok(Expr::like(column, like, value.to_string()?, negated))
}

fn unknown(table: &app::Table, field: &str) -> Error {
    Error::invalid_argument(format!("unknown filter field `{field}` for `{}`", table.name))
}
