use super::{cursor, filter, Limits};
use crate::RequestContext;

use async_graphql::{
    dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, ObjectAccessor, TypeRef},
    Value as GqlValue,
};
use indexql_core::{
    schema::app::{self, Column},
    stmt::{Direction, Expr, OrderBy, Row, Select},
    Error, Result,
};
use tracing::debug;

pub(super) const PAGE_INFO: &str = "PageInfo";

/// One page of a plural field.
#[derive(Debug, Clone)]
pub(super) struct Page {
    pub(super) items: Vec<Row>,
    pub(super) info: PageInfo,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PageInfo {
    pub(super) has_next_page: bool,
    pub(super) has_previous_page: bool,
    pub(super) start_cursor: Option<String>,
    pub(super) end_cursor: Option<String>,
}

/// Arguments shared by plural root fields and `many` relation fields.
#[derive(Debug, Clone, Default)]
pub(super) struct PluralArgs {
    pub(super) filter: Option<GqlValue>,
    pub(super) order_by: Option<String>,
    pub(super) order_direction: Option<String>,
    pub(super) before: Option<String>,
    pub(super) after: Option<String>,
    pub(super) limit: Option<i64>,
}

impl PluralArgs {
    pub(super) fn from_args(args: &ObjectAccessor<'_>) -> Result<Self> {
        let value = |name: &str| {
            args.get(name)
                .map(|v| v.as_value().clone())
                .filter(|v| !matches!(v, GqlValue::Null))
        };
        let string = |name: &str| match value(name) {
            None => Ok(None),
            Some(GqlValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(Error::invalid_argument(format!(
                "`{name}` must be a string; got `{other}`"
            ))),
        };

        let limit = match value("limit") {
            None => None,
            Some(GqlValue::Number(n)) => Some(n.as_i64().ok_or_else(|| {
                Error::invalid_argument(format!("`limit` must be an integer; got `{n}`"))
            })?),
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "`limit` must be an integer; got `{other}`"
                )))
            }
        };

        Ok(Self {
            filter: value("where"),
            order_by: string("orderBy")?,
            order_direction: string("orderDirection")?,
            before: string("before")?,
            after: string("after")?,
            limit,
        })
    }
}

/// Adds the plural arguments to `field`.
pub(super) fn with_plural_arguments(field: Field, filter_type: &str) -> Field {
    field
        .argument(InputValue::new("where", TypeRef::named(filter_type)))
        .argument(InputValue::new("orderBy", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("orderDirection", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("before", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("after", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("limit", TypeRef::named(TypeRef::INT)))
}

/// Loads one page of `table`. `scope` restricts the rows before any
/// user-supplied filter applies.
pub(super) async fn load(
    cx: &RequestContext,
    table: &app::Table,
    args: PluralArgs,
    scope: Option<Expr>,
    limits: Limits,
) -> Result<Page> {
    let db_table = cx.table(&table.name)?;
    let limit = limits.resolve(args.limit)?;

    let order_name = args.order_by.as_deref().unwrap_or(app::Table::ID);
    let order_column = table
        .column(order_name)
        .filter(|c| c.is_material() && !matches!(c, Column::Json(_)))
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "cannot order `{}` by `{order_name}`",
                table.name
            ))
        })?;
    let order_id = db_table
        .column_by_name(order_name)
        .ok_or_else(|| Error::invalid_argument(format!("unknown column `{order_name}`")))?
        .id;

    let id_column = table
        .id_column()
        .ok_or_else(|| Error::invalid_schema(format!("table `{}` has no `id`", table.name)))?;
    let id = db_table.primary_key;

    let direction = match args.order_direction.as_deref() {
        Some(direction) => direction.parse::<Direction>()?,
        None => Direction::default(),
    };

    let mut select = Select::new(db_table.id);

    if let Some(scope) = scope {
        select = select.filter(scope);
    }
    if let Some(filter) = &args.filter {
        select = select.filter(filter::where_expr(table, db_table, filter)?);
    }

    // Pages before a cursor are fetched in reverse and flipped afterwards.
    let (position, fetch_direction) = match (&args.after, &args.before) {
        (Some(_), Some(_)) => {
            return Err(Error::invalid_argument(
                "`before` and `after` cannot be combined",
            ))
        }
        (Some(after), None) => (Some(cursor::decode(after, order_column, id_column)?), direction),
        (None, Some(before)) => (
            Some(cursor::decode(before, order_column, id_column)?),
            direction.reverse(),
        ),
        (None, None) => (None, direction),
    };

    if let Some(position) = position {
        select = select.filter(cursor::after(position, order_id, id, fetch_direction));
    }

    select = select.order_by(OrderBy {
        column: order_id,
        direction: fetch_direction,
    });
    if order_id != id {
        select = select.order_by(OrderBy {
            column: id,
            direction: fetch_direction,
        });
    }
    select = select.limit(limit + 1);

    debug!(table = %table.name, order_by = order_name, ?direction, limit, "loading page");

    let mut items = cx.store.select(&select).await?;
    let has_more = items.len() as u64 > limit;
    items.truncate(limit as usize);

    let backwards = args.before.is_some();
    if backwards {
        items.reverse();
    }

    let info = PageInfo {
        has_next_page: if backwards { true } else { has_more },
        has_previous_page: if backwards { has_more } else { args.after.is_some() },
        start_cursor: items
            .first()
            .map(|row| cursor::encode(row, order_name))
            .transpose()?,
        end_cursor: items
            .last()
            .map(|row| cursor::encode(row, order_name))
            .transpose()?,
    };

    Ok(Page { items, info })
}

pub(super) fn page_name(table: &str) -> String {
    format!("{table}Page")
}

/// The `<Table>Page` object.
pub(super) fn page_type(table: &str) -> Object {
    Object::new(page_name(table))
        .field(Field::new(
            "items",
            TypeRef::named_nn_list_nn(table),
            |ctx| {
                FieldFuture::new(async move {
                    let page = ctx.parent_value.try_downcast_ref::<Page>()?;
                    Ok(Some(FieldValue::list(
                        page.items.iter().cloned().map(FieldValue::owned_any),
                    )))
                })
            },
        ))
        .field(Field::new(
            "pageInfo",
            TypeRef::named_nn(PAGE_INFO),
            |ctx| {
                FieldFuture::new(async move {
                    let page = ctx.parent_value.try_downcast_ref::<Page>()?;
                    Ok(Some(FieldValue::owned_any(page.info.clone())))
                })
            },
        ))
}

/// The shared `PageInfo` object.
pub(super) fn page_info_type() -> Object {
    Object::new(PAGE_INFO)
        .field(info_field("hasNextPage", TypeRef::BOOLEAN, true, |info| {
            GqlValue::Boolean(info.has_next_page)
        }))
        .field(info_field("hasPreviousPage", TypeRef::BOOLEAN, true, |info| {
            GqlValue::Boolean(info.has_previous_page)
        }))
        .field(info_field("startCursor", TypeRef::STRING, false, |info| {
            cursor_value(&info.start_cursor)
        }))
        .field(info_field("endCursor", TypeRef::STRING, false, |info| {
            cursor_value(&info.end_cursor)
        }))
}

fn info_field(name: &str, ty: &str, non_null: bool, get: fn(&PageInfo) -> GqlValue) -> Field {
    let type_ref = if non_null {
        TypeRef::named_nn(ty)
    } else {
        TypeRef::named(ty)
    };

    Field::new(name, type_ref, move |ctx| {
        FieldFuture::new(async move {
            let info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
            Ok(Some(FieldValue::value(get(info))))
        })
    })
}

fn cursor_value(cursor: &Option<String>) -> GqlValue {
    match cursor {
        Some(cursor) => GqlValue::String(cursor.clone()),
        None => GqlValue::Null,
    }
}
