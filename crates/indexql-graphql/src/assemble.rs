use crate::TypeBuilders;

use async_graphql::dynamic::{Object, Schema};
use indexql_core::{schema::app, Error, Result};
use tracing::{debug, info};

/// Assembles the executable query schema for `schema`.
///
/// Every table gets a singular root field (`account`) and a plural root
/// field (`accounts`). Fails with an invalid-schema error when the builders
/// did not produce an entity, page or filter type for a table.
pub fn build_schema(schema: &app::Schema, builders: &impl TypeBuilders) -> Result<Schema> {
    let enums = builders.build_enum_types(schema);
    let filters = builders.build_filter_types(schema, &enums);
    let entities = builders.build_entity_types(schema, &enums, &filters);

    let mut query = Object::new("Query");

    for table in schema.tables.values() {
        let entity = entities
            .entities
            .get(&table.name)
            .ok_or_else(|| missing("entity", &table.name))?;
        let page = entities
            .pages
            .get(&table.name)
            .ok_or_else(|| missing("page", &table.name))?;
        let filter = filters
            .get(&table.name)
            .ok_or_else(|| missing("filter", &table.name))?;

        let singular = singular_name(&table.name);
        let plural = plural_name(&table.name);
        debug!(table = %table.name, %singular, %plural, "adding root fields");

        query = query
            .field(builders.build_singular_field(&singular, table, entity))
            .field(builders.build_plural_field(&plural, table, page, filter));
    }

    let mut builder = Schema::build(query.type_name(), None, None).register(query);

    for (_, ty) in enums {
        builder = builder.register(ty);
    }
    for (_, ty) in filters {
        builder = builder.register(ty);
    }
    for (_, ty) in entities.entities {
        builder = builder.register(ty);
    }
    for (_, ty) in entities.pages {
        builder = builder.register(ty);
    }
    for ty in entities.extra {
        builder = builder.register(ty);
    }

    let schema_out = builder.finish().map_err(|err| {
        Error::invalid_schema(format!("failed to assemble query schema: {err}"))
    })?;

    info!(tables = schema.tables.len(), "assembled query schema");
    Ok(schema_out)
}

/// The singular root field name: the table name with its first character
/// lower-cased.
pub fn singular_name(table: &str) -> String {
    let mut chars = table.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The plural root field name: the singular name with a literal `s`.
pub fn plural_name(table: &str) -> String {
    format!("{}s", singular_name(table))
}

fn missing(what: &str, table: &str) -> Error {
    Error::invalid_schema(format!(
        "type builders produced no {what} type for table `{table}`"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_field_names() {
        assert_eq!(singular_name("Account"), "account");
        assert_eq!(plural_name("Account"), "accounts");
        assert_eq!(singular_name("Transfer"), "transfer");
        assert_eq!(plural_name("Transfer"), "transfers");
        assert_eq!(singular_name("TokenApproval"), "tokenApproval");
        assert_eq!(plural_name("Status"), "statuss");
    }
}
