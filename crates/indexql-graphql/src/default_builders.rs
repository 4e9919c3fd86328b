//! The stock [`TypeBuilders`] implementation.

mod convert;
mod cursor;
mod entity;
mod field;
mod filter;
mod page;
mod scalar;

use crate::{EntityTypes, EnumTypes, FilterTypes, TypeBuilders};

use async_graphql::dynamic::{Enum, EnumItem, Field, InputObject, Object};
use indexql_core::{schema::app, Error, Result};

/// Page size bounds for plural fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Page size when `limit` is not given.
    pub default_limit: u64,

    /// Largest accepted `limit`.
    pub max_limit: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 1000,
        }
    }
}

impl Limits {
    fn resolve(self, requested: Option<i64>) -> Result<u64> {
        match requested {
            None => Ok(self.default_limit.min(self.max_limit)),
            Some(limit) if limit < 0 => Err(Error::invalid_argument(format!(
                "`limit` cannot be negative; got {limit}"
            ))),
            Some(limit) if limit as u64 > self.max_limit => Err(Error::invalid_argument(format!(
                "`limit` must be at most {}; got {limit}",
                self.max_limit
            ))),
            Some(limit) => Ok(limit as u64),
        }
    }
}

/// Builds scalars, enums, `<Table>Filter`, `<Table>`, `<Table>Page` and
/// `PageInfo`, plus resolvers reading from the request's
/// [`RequestContext`](crate::RequestContext).
#[derive(Debug, Clone, Default)]
pub struct DefaultTypeBuilders {
    limits: Limits,
}

impl DefaultTypeBuilders {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }
}

impl TypeBuilders for DefaultTypeBuilders {
    fn build_enum_types(&self, schema: &app::Schema) -> EnumTypes {
        schema
            .enums
            .values()
            .map(|enumeration| {
                let ty = enumeration
                    .values
                    .iter()
                    .fold(Enum::new(&enumeration.name), |ty, value| {
                        ty.item(EnumItem::new(value))
                    });
                (enumeration.name.clone(), ty)
            })
            .collect()
    }

    fn build_filter_types(&self, schema: &app::Schema, _enums: &EnumTypes) -> FilterTypes {
        schema
            .tables
            .values()
            .map(|table| (table.name.clone(), filter::filter_type(table)))
            .collect()
    }

    fn build_entity_types(
        &self,
        schema: &app::Schema,
        _enums: &EnumTypes,
        _filters: &FilterTypes,
    ) -> EntityTypes {
        let mut types = EntityTypes::default();

        for table in schema.tables.values() {
            types.entities.insert(
                table.name.clone(),
                entity::entity_type(schema, table, self.limits),
            );
            types
                .pages
                .insert(table.name.clone(), page::page_type(&table.name));
        }

        types.extra.extend(scalar::scalar_types());
        types.extra.push(page::page_info_type().into());
        types
    }

    fn build_singular_field(&self, field_name: &str, table: &app::Table, entity: &Object) -> Field {
        field::singular_field(field_name, table, entity)
    }

    fn build_plural_field(
        &self,
        field_name: &str,
        table: &app::Table,
        page: &Object,
        filter: &InputObject,
    ) -> Field {
        field::plural_field(field_name, table, page, filter, self.limits)
    }
}
