use super::{convert, page, Limits};
use crate::RequestContext;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputObject, InputValue, Object, TypeRef};
use indexql_core::{
    schema::app::{self, Column},
    stmt::Key,
};
use std::sync::Arc;

/// `<table>(id: <IdType>!): <Table>`
pub(super) fn singular_field(field_name: &str, table: &app::Table, entity: &Object) -> Field {
    let id_column = Arc::new(table.id_column().cloned().unwrap_or_else(Column::string));
    let id_type = convert::type_name(&id_column).unwrap_or(TypeRef::STRING).to_string();
    let table_name = Arc::<str>::from(table.name.as_str());

    Field::new(field_name, TypeRef::named(entity.type_name()), move |ctx| {
        let id_column = id_column.clone();
        let table_name = table_name.clone();

        FieldFuture::new(async move {
            let id = ctx.args.try_get("id")?.as_value().clone().into_json()?;
            let key = Key::try_from(convert::from_json(id, &id_column)?)?;

            let cx = ctx.data::<RequestContext>()?;
            let row = cx.loaders.get(&table_name, app::Table::ID)?.load(key).await?;
            Ok(row.map(FieldValue::owned_any))
        })
    })
    .argument(InputValue::new("id", TypeRef::named_nn(id_type)))
}

/// `<table>s(where, orderBy, orderDirection, before, after, limit): <Table>Page!`
pub(super) fn plural_field(
    field_name: &str,
    table: &app::Table,
    page_type: &Object,
    filter_type: &InputObject,
    limits: Limits,
) -> Field {
    let table = Arc::new(table.clone());

    let field = Field::new(field_name, TypeRef::named_nn(page_type.type_name()), move |ctx| {
        let table = table.clone();

        FieldFuture::new(async move {
            let cx = ctx.data::<RequestContext>()?;
            let args = page::PluralArgs::from_args(&ctx.args)?;
            let page = page::load(cx, &table, args, None, limits).await?;
            Ok(Some(FieldValue::owned_any(page)))
        })
    });

    page::with_plural_arguments(field, filter_type.type_name())
}
