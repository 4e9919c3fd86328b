use super::{convert, filter, page, Limits};
use crate::RequestContext;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, TypeRef};
use indexql_core::{
    err,
    schema::app::{self, Column, ManyColumn, OneColumn},
    stmt::{Expr, Key, Row, Value},
    Error,
};
use std::sync::Arc;
use tracing::warn;

/// The `<Table>` object: one field per column, relations included.
pub(super) fn entity_type(schema: &app::Schema, table: &app::Table, limits: Limits) -> Object {
    let mut object = Object::new(&table.name);

    for (name, column) in &table.columns {
        let field = match column {
            Column::One(one) => one_field(table, name, one),
            Column::Many(many) => many_field(schema, name, many, limits),
            material => material_field(name, material),
        };

        match field {
            Some(field) => object = object.field(field),
            None => warn!(table = %table.name, column = %name, "skipping unresolvable column"),
        }
    }

    object
}

fn material_field(name: &str, column: &Column) -> Option<Field> {
    let ty = convert::type_name(column)?;
    let type_ref = if column.is_optional() {
        TypeRef::named(ty)
    } else {
        TypeRef::named_nn(ty)
    };

    let column_name = Arc::<str>::from(name);
    let column = Arc::new(column.clone());

    Some(Field::new(name, type_ref, move |ctx| {
        let column_name = column_name.clone();
        let column = column.clone();

        FieldFuture::new(async move {
            let row = ctx.parent_value.try_downcast_ref::<Row>()?;
            let value = row.get(&column_name).cloned().unwrap_or_default();
            Ok(Some(FieldValue::value(convert::column_to_graphql(
                &column_name,
                value,
                &column,
            )?)))
        })
    }))
}

/// Resolves the row a reference column points at, through the request's
/// loader for `(target, id)`.
fn one_field(table: &app::Table, name: &str, one: &OneColumn) -> Option<Field> {
    let reference = table.column(&one.reference)?.as_reference()?;
    let (target, _) = reference.references.split_once('.')?;

    let type_ref = if reference.optional {
        TypeRef::named(target)
    } else {
        TypeRef::named_nn(target)
    };

    let target = Arc::<str>::from(target);
    let reference = Arc::<str>::from(one.reference.as_str());

    Some(Field::new(name, type_ref, move |ctx| {
        let target = target.clone();
        let reference = reference.clone();

        FieldFuture::new(async move {
            let row = ctx.parent_value.try_downcast_ref::<Row>()?;
            let key = match row.get(&reference) {
                None | Some(Value::Null) => return Ok(None),
                Some(value) => Key::try_from(value)?,
            };

            let cx = ctx.data::<RequestContext>()?;
            let related = cx.loaders.get(&target, app::Table::ID)?.load(key).await?;
            Ok(related.map(FieldValue::owned_any))
        })
    }))
}

/// Pages through the rows of another table whose back-reference column
/// holds this row's `id`.
fn many_field(schema: &app::Schema, name: &str, many: &ManyColumn, limits: Limits) -> Option<Field> {
    let target = Arc::new(schema.table(&many.table)?.clone());
    let back_reference = Arc::<str>::from(many.column.as_str());

    let field = Field::new(
        name,
        TypeRef::named_nn(page::page_name(&many.table)),
        move |ctx| {
            let target = target.clone();
            let back_reference = back_reference.clone();

            FieldFuture::new(async move {
                let row = ctx.parent_value.try_downcast_ref::<Row>()?;
                let id = row
                    .get(app::Table::ID)
                    .filter(|id| !id.is_null())
                    .cloned()
                    .ok_or_else(|| err!("parent row has no `id`"))?;

                let cx = ctx.data::<RequestContext>()?;
                let column = cx
                    .table(&target.name)?
                    .column_by_name(&back_reference)
                    .ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "column `{}.{back_reference}` is not stored",
                            target.name
                        ))
                    })?
                    .id;

                let args = page::PluralArgs::from_args(&ctx.args)?;
                let scope = Expr::eq(column, id);
                let page = page::load(cx, &target, args, Some(scope), limits).await?;
                Ok(Some(FieldValue::owned_any(page)))
            })
        },
    );

    Some(page::with_plural_arguments(
        field,
        &filter::filter_name(&many.table),
    ))
}
